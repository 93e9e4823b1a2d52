//! Run observer trait for progress reporting and data collection.

use rm_core::{Cycle, TaskId};

use crate::{AbortReason, RunReport, SimulationState};

/// What happened in one real cycle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CycleSummary {
    pub cycle:     Cycle,
    /// Blocked steps retried at the start of the cycle.
    pub retried:   usize,
    /// Retries that succeeded and left the blocked set.
    pub unblocked: usize,
    /// Fresh steps executed.
    pub executed:  usize,
    /// Size of the blocked set once the cycle (and any recovery) finished.
    pub blocked:   usize,
    /// Tasks aborted by deadlock recovery this cycle.
    pub victims:   Vec<TaskId>,
    /// Terminated or aborted tasks at the end of the cycle.
    pub finished:  usize,
}

impl CycleSummary {
    pub fn deadlocked(&self) -> bool {
        !self.victims.is_empty()
    }
}

/// Callbacks invoked by [`Engine::run`][crate::Engine::run] at key points in
/// the cycle loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
pub trait SimObserver {
    /// Called at the very start of each real cycle.
    fn on_cycle_start(&mut self, _cycle: Cycle) {}

    /// Called after the cycle's recovery loop, before the clock advances.
    fn on_cycle_end(&mut self, _summary: &CycleSummary) {}

    /// Called each time the deadlock condition holds, with the blocked tasks.
    fn on_deadlock(&mut self, _cycle: Cycle, _stalled: &[TaskId]) {}

    /// Called for every abort, by recovery or by the admission policy.
    fn on_abort(&mut self, _task: TaskId, _cycle: Cycle, _reason: &AbortReason) {}

    /// Called every `config.snapshot_interval_cycles` real cycles.
    fn on_snapshot(&mut self, _cycle: Cycle, _state: &SimulationState) {}

    /// Called once after the last cycle.
    fn on_run_end(&mut self, _report: &RunReport) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
