//! The linked step arena and the validated workload built around it.

use rm_core::{ResourceId, StepId, TaskId};

use crate::{Step, StepKind, StepTarget, WorkloadError, WorkloadResult};

// ── Program ───────────────────────────────────────────────────────────────────

/// All steps of all tasks, in file order, with per-task `next`/`prev` links.
///
/// Links are arena indices rather than references so the engine can rewind a
/// cursor (`step.prev`) or replay a step without holding borrows into the
/// program.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Program {
    steps:  Vec<Step>,
    /// First step of each task, indexed by `TaskId`.
    first:  Vec<Option<StepId>>,
    groups: u32,
}

impl Program {
    /// Assign ids, link each step to its task's neighbours, and record every
    /// task's first step.
    ///
    /// Links are found with a single forward pass that remembers the most
    /// recent step seen for each task.  `task_count` sizes the first-step
    /// table; steps naming a task outside it are the caller's problem (see
    /// [`Workload::new`]).
    pub fn new(mut steps: Vec<Step>, task_count: usize) -> Self {
        let mut first: Vec<Option<StepId>> = vec![None; task_count];
        let mut last:  Vec<Option<StepId>> = vec![None; task_count];
        let mut groups = 0;

        for i in 0..steps.len() {
            let id = StepId(i as u32);
            let task = steps[i].task.index();
            steps[i].id = id;
            steps[i].next = None;
            steps[i].prev = None;
            groups = groups.max(steps[i].group + 1);

            if task >= task_count {
                continue;
            }
            match last[task] {
                Some(prev) => {
                    steps[prev.index()].next = Some(id);
                    steps[i].prev = Some(prev);
                }
                None => first[task] = Some(id),
            }
            last[task] = Some(id);
        }

        Self { steps, first, groups }
    }

    #[inline]
    pub fn step(&self, id: StepId) -> &Step {
        &self.steps[id.index()]
    }

    pub fn get(&self, id: StepId) -> Option<&Step> {
        self.steps.get(id.index())
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn task_count(&self) -> usize {
        self.first.len()
    }

    /// Number of blank-line-delimited groups (at least 1 for a non-empty
    /// program).
    pub fn group_count(&self) -> u32 {
        self.groups
    }

    /// The step a task starts at.
    pub fn first_step(&self, task: TaskId) -> Option<StepId> {
        self.first.get(task.index()).copied().flatten()
    }

    /// The task's steps in program order, following `next` links.
    pub fn steps_of(&self, task: TaskId) -> impl Iterator<Item = &Step> + '_ {
        let mut cursor = self.first_step(task);
        std::iter::from_fn(move || {
            let step = self.step(cursor?);
            cursor = step.next;
            Some(step)
        })
    }
}

// ── Workload ──────────────────────────────────────────────────────────────────

/// A validated simulation input: resource capacities plus the linked program.
///
/// Everything the engine needs to build a fresh run state.  A `Workload` is
/// never mutated by a run, so one value serves both manager runs.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Workload {
    /// Total units of each resource, indexed by `ResourceId`.
    pub capacities: Vec<u32>,
    pub program:    Program,
}

impl Workload {
    /// Link `steps` into a program and check that every task has a runnable
    /// shape: at least one step, starts with `initiate`, ends with
    /// `terminate`, and nothing follows the `terminate`.
    pub fn new(capacities: Vec<u32>, task_count: usize, steps: Vec<Step>) -> WorkloadResult<Self> {
        for (i, step) in steps.iter().enumerate() {
            let id = StepId(i as u32);
            if step.task.index() >= task_count {
                return Err(WorkloadError::TaskOutOfRange {
                    line:  0,
                    task:  step.task.number(),
                    count: task_count,
                });
            }
            check_target(id, step, capacities.len())?;
        }

        // Every task needs a step, so a larger count leaves some task empty.
        if task_count > steps.len() {
            return Err(WorkloadError::EmptyProgram { task: first_task_without_steps(&steps) });
        }

        let program = Program::new(steps, task_count);

        for t in 0..task_count as u32 {
            let task = TaskId(t);
            let mut steps = program.steps_of(task);

            let Some(head) = steps.next() else {
                return Err(WorkloadError::EmptyProgram { task });
            };
            if head.kind != StepKind::Initiate {
                return Err(WorkloadError::MissingInitiate { task, found: head.kind });
            }

            let mut terminated = false;
            for step in program.steps_of(task) {
                if terminated {
                    return Err(WorkloadError::StepAfterTerminate { task, step: step.id });
                }
                terminated = step.kind == StepKind::Terminate;
            }
            if !terminated {
                return Err(WorkloadError::MissingTerminate { task });
            }
        }

        Ok(Self { capacities, program })
    }

    pub fn task_count(&self) -> usize {
        self.program.task_count()
    }

    pub fn resource_count(&self) -> usize {
        self.capacities.len()
    }

    pub fn capacity(&self, resource: ResourceId) -> u32 {
        self.capacities[resource.index()]
    }
}

/// Lowest task id with no step.  Only ids up to `steps.len()` are tracked.
fn first_task_without_steps(steps: &[Step]) -> TaskId {
    let mut seen = vec![false; steps.len() + 1];
    for step in steps {
        if let Some(slot) = seen.get_mut(step.task.index()) {
            *slot = true;
        }
    }
    let missing = seen.iter().position(|s| !s).unwrap_or(steps.len());
    TaskId(missing as u32)
}

fn check_target(id: StepId, step: &Step, resource_count: usize) -> WorkloadResult<()> {
    match (step.kind.uses_resource(), step.target) {
        (true, StepTarget::Resource(r)) if r.index() < resource_count => Ok(()),
        (true, StepTarget::Resource(r)) => Err(WorkloadError::ResourceOutOfRange {
            line:     0,
            resource: r.number(),
            count:    resource_count,
        }),
        (true, StepTarget::Duration(_)) => Err(WorkloadError::TargetMismatch {
            step:     id,
            kind:     step.kind,
            expected: "resource",
        }),
        (false, StepTarget::Duration(_)) => Ok(()),
        (false, StepTarget::Resource(_)) => Err(WorkloadError::TargetMismatch {
            step:     id,
            kind:     step.kind,
            expected: "duration",
        }),
    }
}
