//! Deadlock detection, victim selection, and the speculative retest.

use rm_core::{Cycle, TaskId};

use crate::{Effect, Outcome, SimulationState, TaskStatus};

/// True when every live task is waiting on a blocked step.
///
/// Each live task has at most one entry in the blocked set, so equal counts
/// mean nobody can make progress.
pub fn is_deadlocked(state: &SimulationState) -> bool {
    let live = state.live_count();
    live > 0 && live == state.blocked.len()
}

/// The task recovery aborts: the lowest-id running task, or failing that
/// the lowest-id live one.
pub fn select_victim(state: &SimulationState) -> Option<TaskId> {
    state
        .tasks
        .iter()
        .find(|t| t.status == TaskStatus::Running)
        .or_else(|| state.tasks.iter().find(|t| t.status.is_live()))
        .map(|t| t.id)
}

// ── Speculative cycle ─────────────────────────────────────────────────────────

/// Outcomes of a cycle that was evaluated but not committed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpeculativeCycle {
    /// One outcome per live task with a step to retry, ascending task id.
    pub outcomes: Vec<Outcome>,
}

impl SpeculativeCycle {
    /// Outcomes that would block again.
    pub fn stalled(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.succeeded()).count()
    }

    /// The retest's verdict given `live` live tasks.
    pub fn is_deadlocked(&self, live: usize) -> bool {
        live > 0 && self.stalled() == live
    }

    /// Cycles the clock would have advanced by through compute steps.
    pub fn proposed_clock_advance(&self) -> u64 {
        self.outcomes
            .iter()
            .map(|o| match o.effect {
                Effect::Advance(n) => u64::from(n),
                _ => 0,
            })
            .sum()
    }
}

// ── Episode record ────────────────────────────────────────────────────────────

/// One deadlock and everything done to clear it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecoveryEpisode {
    pub cycle:   Cycle,
    /// Aborted tasks, in abort order.
    pub victims: Vec<TaskId>,
    /// Speculative retests run.
    pub retests: usize,
}

impl RecoveryEpisode {
    pub fn new(cycle: Cycle) -> Self {
        Self { cycle, ..Self::default() }
    }

    /// More than one abort was needed.
    pub fn is_multiple(&self) -> bool {
        self.victims.len() > 1
    }

    /// Take back one wait cycle from every live task.  Runs after each abort,
    /// so a task charged during the deadlocked cycle loses one unit per
    /// victim, never going below zero.
    pub(crate) fn compensate_waits(&self, state: &mut SimulationState) {
        for task in state.tasks.iter_mut().filter(|t| t.status.is_live()) {
            task.wait = task.wait.saturating_sub(1);
        }
    }
}
