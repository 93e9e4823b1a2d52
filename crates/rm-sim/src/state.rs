//! Mutable per-run state: clock, tasks, resources, cursors, blocked set.

use rm_core::{ResourceId, SimClock, StepId, TaskId};
use rm_workload::{Program, Workload};

use crate::{Effect, Outcome, Resource, SimError, SimResult, Task, TaskStatus};

// ── Per-step transient flags ──────────────────────────────────────────────────

/// Flags the cycle engine sets on steps during one pass.  Cleared at the
/// start of every cycle and after every recovery abort.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StepFlags {
    /// The blocked step succeeded on retry and leaves the blocked set.
    pub pending_removal: bool,
    /// The task was already served by a retry this cycle.
    pub skip_this_pass:  bool,
}

/// One entry in the blocked set.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BlockedStep {
    pub task: TaskId,
    pub step: StepId,
}

// ── SimulationState ───────────────────────────────────────────────────────────

/// Everything a run mutates.
///
/// The static [`Program`] is shared read-only; this struct owns the rest.
/// Each manager run builds its own state from the same [`Workload`], so the
/// two runs never observe each other.
///
/// `Clone + PartialEq` so tests can snapshot a state and compare it after a
/// speculative retest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationState {
    pub clock:     SimClock,
    /// Indexed by `TaskId`.
    pub tasks:     Vec<Task>,
    /// Indexed by `ResourceId`.
    pub resources: Vec<Resource>,
    /// Next step each task will attempt, indexed by `TaskId`.
    pub cursor:    Vec<Option<StepId>>,
    /// Steps that could not be satisfied, oldest first.  At most one per task.
    pub blocked:   Vec<BlockedStep>,
    flags:         Vec<StepFlags>,
}

impl SimulationState {
    /// A fresh state: full resources, every task `NotStarted` with its cursor
    /// on its first step.
    pub fn new(workload: &Workload) -> Self {
        let program = &workload.program;
        let tasks = (0..workload.task_count() as u32).map(|t| Task::new(TaskId(t))).collect();
        let resources = workload
            .capacities
            .iter()
            .enumerate()
            .map(|(r, &total)| Resource::new(ResourceId(r as u32), total))
            .collect();
        let cursor = (0..workload.task_count() as u32)
            .map(|t| program.first_step(TaskId(t)))
            .collect();

        Self {
            clock: SimClock::new(),
            tasks,
            resources,
            cursor,
            blocked: Vec::new(),
            flags: vec![StepFlags::default(); program.len()],
        }
    }

    /// Return to the state [`new`][Self::new] would build.
    pub fn reset(&mut self, program: &Program) {
        self.clock.reset();
        self.tasks.iter_mut().for_each(Task::reset);
        self.resources.iter_mut().for_each(Resource::reset);
        for (t, cursor) in self.cursor.iter_mut().enumerate() {
            *cursor = program.first_step(TaskId(t as u32));
        }
        self.blocked.clear();
        self.clear_flags();
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    #[inline]
    pub fn task(&self, id: TaskId) -> &Task {
        &self.tasks[id.index()]
    }

    #[inline]
    pub fn resource(&self, id: ResourceId) -> &Resource {
        &self.resources[id.index()]
    }

    pub fn live_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.status.is_live()).count()
    }

    pub fn finished_count(&self) -> usize {
        self.tasks.len() - self.live_count()
    }

    pub fn all_finished(&self) -> bool {
        self.tasks.iter().all(|t| t.status.is_finished())
    }

    /// Ids of the tasks in the blocked set, oldest first.
    pub fn blocked_tasks(&self) -> Vec<TaskId> {
        self.blocked.iter().map(|b| b.task).collect()
    }

    // ── Transient flags ───────────────────────────────────────────────────

    #[inline]
    pub fn flags(&self, step: StepId) -> StepFlags {
        self.flags[step.index()]
    }

    pub(crate) fn flags_mut(&mut self, step: StepId) -> &mut StepFlags {
        &mut self.flags[step.index()]
    }

    pub fn clear_flags(&mut self) {
        self.flags.fill(StepFlags::default());
    }

    /// Drop every blocked step flagged for removal.
    pub(crate) fn drain_unblocked(&mut self) -> usize {
        let before = self.blocked.len();
        let flags = &self.flags;
        self.blocked.retain(|b| !flags[b.step.index()].pending_removal);
        before - self.blocked.len()
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Make every deferred release available.  Returns the units flushed.
    pub fn flush_pending(&mut self) -> u32 {
        self.resources.iter_mut().map(Resource::flush_pending).sum()
    }

    /// Apply an evaluated outcome.
    ///
    /// Fails only when the outcome no longer matches the state, which means
    /// it was evaluated against a different state.
    pub fn commit(&mut self, outcome: &Outcome) -> SimResult<()> {
        let now = self.clock.current;
        let id = outcome.task;

        match outcome.effect {
            Effect::Start => {
                let task = &mut self.tasks[id.index()];
                if task.status == TaskStatus::NotStarted {
                    task.start = now;
                }
                task.status = TaskStatus::Running;
            }
            Effect::Grant { resource, amount } => {
                if !self.resources[resource.index()].allocate(amount) {
                    return Err(SimError::InvariantViolation(format!(
                        "{id} granted {amount} of {resource} with only {} available",
                        self.resource(resource).available(),
                    )));
                }
                self.resources[resource.index()].register_holder(id);
                let task = &mut self.tasks[id.index()];
                task.hold(resource, amount);
                task.status = TaskStatus::Running;
            }
            Effect::Defer { resource, amount } => {
                let task = &mut self.tasks[id.index()];
                let remaining = task.give_back(resource, amount).ok_or_else(|| {
                    SimError::InvariantViolation(format!(
                        "{id} released {amount} of {resource} but holds {}",
                        task.held(resource),
                    ))
                })?;
                task.status = TaskStatus::Running;
                let pool = &mut self.resources[resource.index()];
                if remaining == 0 {
                    pool.remove_holder(id);
                }
                pool.defer_release(amount);
            }
            Effect::Advance(cycles) => self.clock.advance_by(u64::from(cycles)),
            Effect::Finish => {
                self.release_all(id);
                let task = &mut self.tasks[id.index()];
                task.stop = now;
                task.status = TaskStatus::Terminated;
                self.blocked.retain(|b| b.task != id);
            }
            Effect::Block => {
                let task = &mut self.tasks[id.index()];
                task.status = TaskStatus::Blocked;
                task.wait += 1;
                if !self.blocked.iter().any(|b| b.step == outcome.step) {
                    self.blocked.push(BlockedStep { task: id, step: outcome.step });
                }
            }
            Effect::Abort(_) => {
                self.abort(id);
            }
        }
        Ok(())
    }

    /// Abort `task`: release everything it holds immediately, stamp its stop
    /// cycle and drop it from the blocked set.  Returns what was released.
    pub fn abort(&mut self, task: TaskId) -> Vec<(ResourceId, u32)> {
        let released = self.release_all(task);
        let t = &mut self.tasks[task.index()];
        t.stop = self.clock.current;
        t.status = TaskStatus::Aborted;
        self.blocked.retain(|b| b.task != task);
        released
    }

    fn release_all(&mut self, task: TaskId) -> Vec<(ResourceId, u32)> {
        let released = self.tasks[task.index()].drain_holdings();
        for &(resource, amount) in &released {
            let pool = &mut self.resources[resource.index()];
            pool.release(amount);
            pool.remove_holder(task);
        }
        released
    }

    // ── Invariants ────────────────────────────────────────────────────────

    /// `available + pending + Σheld == total` for every resource.
    pub fn conservation_holds(&self) -> bool {
        self.resources.iter().all(|r| {
            let held: u64 = self.tasks.iter().map(|t| u64::from(t.held(r.id))).sum();
            u64::from(r.available()) + u64::from(r.pending()) + held == u64::from(r.total)
        })
    }

    /// Each resource's holder set is exactly the tasks with units of it.
    pub fn holders_consistent(&self) -> bool {
        self.resources.iter().all(|r| {
            self.tasks
                .iter()
                .all(|t| (t.held(r.id) > 0) == r.is_held_by(t.id))
        })
    }

    /// Every live task's cursor moved back one step: the step it last
    /// attempted.  Finished tasks map to `None`.
    pub fn rewound_cursors(&self, program: &Program) -> Vec<Option<StepId>> {
        self.tasks
            .iter()
            .zip(&self.cursor)
            .map(|(task, cursor)| {
                if task.status.is_finished() {
                    return None;
                }
                cursor.and_then(|s| program.step(s).prev)
            })
            .collect()
    }
}
