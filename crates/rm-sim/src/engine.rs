//! The `Engine` struct and its cycle loop.

use tracing::{debug, info, trace, warn};

use rm_core::{Cycle, SimConfig, StepId, TaskId};
use rm_workload::{Step, Workload};

use crate::recovery::{is_deadlocked, select_victim};
use crate::{
    AbortReason, AdmissionPolicy, CycleSummary, Effect, Outcome, RecoveryEpisode, RunReport,
    SimError, SimObserver, SimResult, SimulationState, SpeculativeCycle, TaskStatus, evaluate,
};

// ── Engine ────────────────────────────────────────────────────────────────────

/// Drives one manager run over a workload.
///
/// `Engine<P>` owns the run state and applies the six-phase cycle:
///
/// 1. **Flush**: units released last cycle become available.
/// 2. **Retry**: every blocked step is re-attempted, oldest first.
/// 3. **Unblock**: steps that succeeded leave the blocked set.
/// 4. **Fresh steps**: every live task not served in 2 runs its cursor
///    step, ascending `TaskId`, and its cursor moves on.
/// 5. **Recovery**: while deadlocked, abort a victim and retest
///    speculatively.
/// 6. **Advance**: the clock moves one cycle.
///
/// Create via [`EngineBuilder`][crate::EngineBuilder].
pub struct Engine<'w, P: AdmissionPolicy> {
    pub config:   SimConfig,
    /// Static program and capacities.  Never mutated by a run.
    pub workload: &'w Workload,
    /// The manager's admission rules.
    pub policy:   P,
    pub state:    SimulationState,
    episodes:     Vec<RecoveryEpisode>,
}

impl<'w, P: AdmissionPolicy> Engine<'w, P> {
    pub(crate) fn from_parts(workload: &'w Workload, policy: P, config: SimConfig) -> Self {
        Self {
            config,
            workload,
            policy,
            state: SimulationState::new(workload),
            episodes: Vec::new(),
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run until every task has terminated or been aborted.
    ///
    /// Fails with [`SimError::CycleLimit`] if that takes more than
    /// `config.max_cycles` real cycles.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<RunReport> {
        while !self.state.all_finished() {
            if self.state.clock.executed >= self.config.max_cycles {
                return Err(SimError::CycleLimit {
                    limit: self.config.max_cycles,
                    live:  self.state.live_count(),
                });
            }
            self.step_cycle(observer)?;
        }

        let report = self.report();
        info!(
            manager = %report.manager,
            cycles  = report.cycles,
            aborted = report.aborted,
            "run complete"
        );
        observer.on_run_end(&report);
        Ok(report)
    }

    /// One full real cycle: phases 1–6.
    pub fn step_cycle<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<CycleSummary> {
        let now = self.state.clock.current;
        observer.on_cycle_start(now);

        let mut summary = self.execute_cycle(observer)?;
        summary.victims = self.recover(observer)?;
        summary.blocked = self.state.blocked.len();
        summary.finished = self.state.finished_count();
        self.state.clear_flags();

        observer.on_cycle_end(&summary);
        if self.config.snapshot_due(self.state.clock.executed + 1) {
            observer.on_snapshot(now, &self.state);
        }
        self.state.clock.advance();
        Ok(summary)
    }

    /// Phases 1–4 only: no recovery and no clock advance.
    pub fn execute_cycle<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<CycleSummary> {
        let workload = self.workload;
        let now = self.state.clock.current;
        self.state.clear_flags();

        // ── Phase 1: deferred releases ────────────────────────────────────
        let flushed = self.state.flush_pending();
        if flushed > 0 {
            trace!(cycle = %now, units = flushed, "deferred releases available");
        }

        // ── Phase 2: retry blocked steps, oldest first ────────────────────
        let retry = self.state.blocked.clone();
        for entry in &retry {
            if let Some(next) = self.state.cursor[entry.task.index()] {
                self.state.flags_mut(next).skip_this_pass = true;
            }
            let Some(outcome) = self.execute_step(entry.step)? else { continue };
            notify_abort(&outcome, now, observer);
            if outcome.succeeded() {
                self.state.flags_mut(entry.step).pending_removal = true;
            }
        }

        // ── Phase 3: drop satisfied steps from the blocked set ────────────
        let unblocked = self.state.drain_unblocked();

        // ── Phase 4: fresh steps, ascending TaskId ────────────────────────
        let mut executed = 0;
        for t in 0..self.state.tasks.len() {
            if self.state.tasks[t].status.is_finished() {
                continue;
            }
            let Some(step) = self.state.cursor[t] else { continue };
            if self.state.flags(step).skip_this_pass {
                continue;
            }
            if let Some(outcome) = self.execute_step(step)? {
                notify_abort(&outcome, now, observer);
            }
            executed += 1;
            self.state.cursor[t] = workload.program.step(step).next;
        }

        Ok(CycleSummary {
            cycle: now,
            retried: retry.len(),
            unblocked,
            executed,
            blocked: self.state.blocked.len(),
            victims: Vec::new(),
            finished: self.state.finished_count(),
        })
    }

    /// Evaluate and commit one step.
    ///
    /// Returns `Ok(None)` for a step of an aborted task (skipped) and
    /// [`SimError::StepAfterTermination`] for a step of a terminated one.
    pub fn execute_step(&mut self, id: StepId) -> SimResult<Option<Outcome>> {
        let workload = self.workload;
        let step = workload.program.step(id);
        let now = self.state.clock.current;

        match self.state.task(step.task).status {
            TaskStatus::Terminated => {
                return Err(SimError::StepAfterTermination { task: step.task, step: id });
            }
            TaskStatus::Aborted => {
                trace!(cycle = %now, %step, "skipped: task aborted");
                return Ok(None);
            }
            _ => {}
        }

        let outcome = evaluate(&self.policy, &self.state, step)?;
        self.state.commit(&outcome)?;
        log_outcome(now, step, &outcome);
        Ok(Some(outcome))
    }

    /// Evaluate the cycle that would follow rewinding every live task's
    /// cursor one step.  Reads the state only.
    pub fn speculative_cycle(&self) -> SimResult<SpeculativeCycle> {
        let program = &self.workload.program;
        let rewound = self.state.rewound_cursors(program);

        let mut outcomes = Vec::new();
        for (task, cursor) in self.state.tasks.iter().zip(rewound) {
            if task.status.is_finished() {
                continue;
            }
            let Some(step) = cursor else { continue };
            outcomes.push(evaluate(&self.policy, &self.state, program.step(step))?);
        }
        Ok(SpeculativeCycle { outcomes })
    }

    pub fn is_deadlocked(&self) -> bool {
        is_deadlocked(&self.state)
    }

    /// Recovery episodes so far, oldest first.
    pub fn episodes(&self) -> &[RecoveryEpisode] {
        &self.episodes
    }

    /// Statistics for the run so far.
    pub fn report(&self) -> RunReport {
        RunReport::build(self.policy.kind(), &self.state, &self.episodes)
    }

    /// Discard all progress; the next `run` starts from cycle 0.
    pub fn reset(&mut self) {
        self.state.reset(&self.workload.program);
        self.episodes.clear();
    }

    // ── Recovery ──────────────────────────────────────────────────────────

    /// Phase 5.  Abort victims until a speculative retest shows progress.
    /// Returns the victims in abort order.
    ///
    /// A blocked set that covers every live task is first confirmed with a
    /// retest: units freed later in the same cycle (a terminate after a
    /// failed retry) can make every blocked step satisfiable, and then
    /// nobody is aborted.
    fn recover<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<Vec<TaskId>> {
        if !self.is_deadlocked() {
            return Ok(Vec::new());
        }

        let now = self.state.clock.current;
        if !self.speculative_cycle()?.is_deadlocked(self.state.live_count()) {
            debug!(cycle = %now, "blocked steps can proceed next cycle");
            return Ok(Vec::new());
        }

        let mut episode = RecoveryEpisode::new(now);
        let mut deadlocked = true;

        while deadlocked {
            let stalled = self.state.blocked_tasks();
            info!(cycle = %now, stalled = stalled.len(), "deadlock detected");
            observer.on_deadlock(now, &stalled);

            let Some(victim) = select_victim(&self.state) else { break };
            let released = self.state.abort(victim);
            info!(cycle = %now, task = %victim, ?released, "aborted deadlock victim");
            observer.on_abort(victim, now, &AbortReason::Deadlock);
            episode.victims.push(victim);

            episode.compensate_waits(&mut self.state);
            self.state.clear_flags();

            let retest = self.speculative_cycle()?;
            episode.retests += 1;
            deadlocked = retest.is_deadlocked(self.state.live_count());
            debug!(
                cycle   = %now,
                stalled = retest.stalled(),
                live    = self.state.live_count(),
                compute = retest.proposed_clock_advance(),
                deadlocked,
                "speculative retest"
            );
        }

        if episode.is_multiple() {
            info!(cycle = %now, aborts = episode.victims.len(), "multiple deadlocks in one cycle");
        }
        let victims = episode.victims.clone();
        self.episodes.push(episode);
        Ok(victims)
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn notify_abort<O: SimObserver>(outcome: &Outcome, now: Cycle, observer: &mut O) {
    if let Effect::Abort(reason) = &outcome.effect {
        observer.on_abort(outcome.task, now, reason);
    }
}

fn log_outcome(now: Cycle, step: &Step, outcome: &Outcome) {
    let task = step.task;
    match &outcome.effect {
        Effect::Start => debug!(cycle = %now, %task, "initiated"),
        Effect::Grant { resource, amount } => {
            debug!(cycle = %now, %task, %resource, amount, "request granted")
        }
        Effect::Defer { resource, amount } => {
            debug!(cycle = %now, %task, %resource, amount, "released, available next cycle")
        }
        Effect::Advance(cycles) => debug!(cycle = %now, %task, cycles, "computing"),
        Effect::Finish => debug!(cycle = %now, %task, "terminated"),
        Effect::Block => debug!(cycle = %now, %task, %step, "blocked"),
        Effect::Abort(reason) => warn!(cycle = %now, %task, %reason, "aborted by admission policy"),
    }
}
