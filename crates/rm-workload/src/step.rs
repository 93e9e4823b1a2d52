//! One instruction of a task program.

use std::fmt;

use rm_core::{ResourceId, StepId, TaskId};

/// What a step does.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StepKind {
    /// Starts the task.  `amount` is the task's declared claim on the
    /// referenced resource (ignored by the opportunistic manager).
    Initiate,
    /// Asks for `amount` more units of a resource.
    Request,
    /// Busy for a number of cycles; touches no resource.
    Compute,
    /// Gives back `amount` units of a resource.
    Release,
    /// Ends the task and returns everything it still holds.
    Terminate,
}

impl StepKind {
    /// The keyword used for this kind in workload files.
    pub fn keyword(self) -> &'static str {
        match self {
            StepKind::Initiate  => "initiate",
            StepKind::Request   => "request",
            StepKind::Compute   => "compute",
            StepKind::Release   => "release",
            StepKind::Terminate => "terminate",
        }
    }

    /// Parse a workload-file keyword.
    pub fn from_keyword(s: &str) -> Option<StepKind> {
        match s {
            "initiate"  => Some(StepKind::Initiate),
            "request"   => Some(StepKind::Request),
            "compute"   => Some(StepKind::Compute),
            "release"   => Some(StepKind::Release),
            "terminate" => Some(StepKind::Terminate),
            _ => None,
        }
    }

    /// True for the kinds whose operand names a resource.
    pub fn uses_resource(self) -> bool {
        matches!(self, StepKind::Initiate | StepKind::Request | StepKind::Release)
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// The step's operand: a resource for initiate/request/release, a cycle
/// count for compute (and the unused field of terminate).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StepTarget {
    Resource(ResourceId),
    Duration(u32),
}

/// A single step in the program arena.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step {
    /// Position in the arena.  Assigned by [`Program::new`][crate::Program::new].
    pub id:     StepId,
    pub kind:   StepKind,
    /// Blank-line-delimited group the step was read from (0-based).
    pub group:  u32,
    pub task:   TaskId,
    pub target: StepTarget,
    /// Units claimed, requested, or released.  Unused by compute/terminate.
    pub amount: u32,
    /// Next step of the same task, `None` after the last.
    pub next:   Option<StepId>,
    /// Previous step of the same task, `None` before the first.
    pub prev:   Option<StepId>,
}

impl Step {
    /// An unlinked step; id and links are filled in by `Program::new`.
    pub fn new(kind: StepKind, task: TaskId, target: StepTarget, amount: u32) -> Self {
        Self {
            id: StepId(0),
            kind,
            group: 0,
            task,
            target,
            amount,
            next: None,
            prev: None,
        }
    }

    pub fn in_group(mut self, group: u32) -> Self {
        self.group = group;
        self
    }

    // ── Convenience constructors (mostly for tests and demos) ─────────────

    pub fn initiate(task: TaskId, resource: ResourceId, claim: u32) -> Self {
        Self::new(StepKind::Initiate, task, StepTarget::Resource(resource), claim)
    }

    pub fn request(task: TaskId, resource: ResourceId, amount: u32) -> Self {
        Self::new(StepKind::Request, task, StepTarget::Resource(resource), amount)
    }

    pub fn release(task: TaskId, resource: ResourceId, amount: u32) -> Self {
        Self::new(StepKind::Release, task, StepTarget::Resource(resource), amount)
    }

    pub fn compute(task: TaskId, cycles: u32) -> Self {
        Self::new(StepKind::Compute, task, StepTarget::Duration(cycles), 0)
    }

    pub fn terminate(task: TaskId) -> Self {
        Self::new(StepKind::Terminate, task, StepTarget::Duration(0), 0)
    }

    // ── Operand accessors ─────────────────────────────────────────────────

    /// The referenced resource, if the operand is one.
    #[inline]
    pub fn resource(&self) -> Option<ResourceId> {
        match self.target {
            StepTarget::Resource(r) => Some(r),
            StepTarget::Duration(_) => None,
        }
    }

    /// The operand as a cycle count, if it is one.
    #[inline]
    pub fn duration(&self) -> Option<u32> {
        match self.target {
            StepTarget::Duration(d) => Some(d),
            StepTarget::Resource(_) => None,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target {
            StepTarget::Resource(r) => {
                write!(f, "{}: {} {} {} x{}", self.id, self.task, self.kind, r, self.amount)
            }
            StepTarget::Duration(d) => write!(f, "{}: {} {} {}", self.id, self.task, self.kind, d),
        }
    }
}
