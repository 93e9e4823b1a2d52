//! Per-task run state.

use std::fmt;

use rustc_hash::FxHashMap;

use rm_core::{Cycle, ResourceId, TaskId};

/// Lifecycle of a task.  `Terminated` and `Aborted` are absorbing.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum TaskStatus {
    #[default]
    NotStarted,
    Running,
    /// Waiting on exactly one unsatisfied request or release.
    Blocked,
    Terminated,
    Aborted,
}

impl TaskStatus {
    #[inline]
    pub fn is_finished(self) -> bool {
        matches!(self, TaskStatus::Terminated | TaskStatus::Aborted)
    }

    #[inline]
    pub fn is_live(self) -> bool {
        !self.is_finished()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskStatus::NotStarted => "not started",
            TaskStatus::Running    => "running",
            TaskStatus::Blocked    => "blocked",
            TaskStatus::Terminated => "terminated",
            TaskStatus::Aborted    => "aborted",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task {
    pub id:     TaskId,
    pub status: TaskStatus,
    /// Cycle of the task's first initiate.
    pub start:  Cycle,
    /// Cycle the task terminated or was aborted.
    pub stop:   Cycle,
    /// Cycles spent blocked.
    pub wait:   u64,
    held:       FxHashMap<ResourceId, u32>,
}

impl Task {
    pub fn new(id: TaskId) -> Self {
        Self {
            id,
            status: TaskStatus::NotStarted,
            start:  Cycle::ZERO,
            stop:   Cycle::ZERO,
            wait:   0,
            held:   FxHashMap::default(),
        }
    }

    /// Units of `resource` this task holds.
    #[inline]
    pub fn held(&self, resource: ResourceId) -> u32 {
        self.held.get(&resource).copied().unwrap_or(0)
    }

    /// Every non-zero holding, in resource order.
    pub fn holdings(&self) -> Vec<(ResourceId, u32)> {
        let mut out: Vec<_> = self.held.iter().map(|(&r, &n)| (r, n)).collect();
        out.sort_unstable();
        out
    }

    pub fn holds_nothing(&self) -> bool {
        self.held.is_empty()
    }

    pub(crate) fn hold(&mut self, resource: ResourceId, amount: u32) {
        if amount > 0 {
            *self.held.entry(resource).or_insert(0) += amount;
        }
    }

    /// Drop `amount` units of `resource`.  Returns what is left, or `None`
    /// if the task holds fewer than `amount`.
    pub(crate) fn give_back(&mut self, resource: ResourceId, amount: u32) -> Option<u32> {
        let current = self.held(resource);
        let remaining = current.checked_sub(amount)?;
        if remaining == 0 {
            self.held.remove(&resource);
        } else {
            self.held.insert(resource, remaining);
        }
        Some(remaining)
    }

    /// Remove and return every holding, in resource order.
    pub(crate) fn drain_holdings(&mut self) -> Vec<(ResourceId, u32)> {
        let mut out: Vec<_> = self.held.drain().collect();
        out.sort_unstable();
        out
    }

    /// `stop - start` for a terminated task.
    pub fn turnaround(&self) -> u64 {
        self.stop.since(self.start)
    }

    pub fn reset(&mut self) {
        *self = Task::new(self.id);
    }
}
