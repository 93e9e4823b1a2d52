//! End-of-run statistics.

use rm_core::{Cycle, TaskId};

use crate::{ManagerKind, RecoveryEpisode, SimulationState, Task, TaskStatus};

/// How a task's run ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TaskOutcome {
    Finished { turnaround: u64, wait: u64 },
    Aborted,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TaskStats {
    pub task:    TaskId,
    pub outcome: TaskOutcome,
}

impl TaskStats {
    pub fn from_task(task: &Task) -> Self {
        let outcome = match task.status {
            TaskStatus::Aborted => TaskOutcome::Aborted,
            _ => TaskOutcome::Finished { turnaround: task.turnaround(), wait: task.wait },
        };
        Self { task: task.id, outcome }
    }

    /// Share of the turnaround spent blocked, as a percentage.  `None` for an
    /// aborted task.
    pub fn wait_percent(&self) -> Option<f64> {
        match self.outcome {
            TaskOutcome::Finished { turnaround, wait } => Some(wait_percent(wait, turnaround)),
            TaskOutcome::Aborted => None,
        }
    }
}

/// Sums over the tasks that finished.  Aborted tasks are excluded.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Totals {
    pub turnaround: u64,
    pub wait:       u64,
}

impl Totals {
    pub fn wait_percent(&self) -> f64 {
        wait_percent(self.wait, self.turnaround)
    }
}

/// `wait / turnaround` as a percentage; 0 when the turnaround is 0.
pub fn wait_percent(wait: u64, turnaround: u64) -> f64 {
    if turnaround == 0 {
        0.0
    } else {
        wait as f64 / turnaround as f64 * 100.0
    }
}

/// Everything one manager run produced.
#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    pub manager:            ManagerKind,
    /// One entry per task, in id order.
    pub tasks:              Vec<TaskStats>,
    pub totals:             Totals,
    /// The clock when the run ended (includes compute advances).
    pub final_cycle:        Cycle,
    /// Real cycles executed.
    pub cycles:             u64,
    /// Recovery episodes, one per cycle that ended in deadlock.
    pub deadlocks:          usize,
    /// True if any episode needed more than one abort.
    pub multiple_deadlocks: bool,
    pub aborted:            usize,
}

impl RunReport {
    pub fn build(manager: ManagerKind, state: &SimulationState, episodes: &[RecoveryEpisode]) -> Self {
        let tasks: Vec<TaskStats> = state.tasks.iter().map(TaskStats::from_task).collect();

        let mut totals = Totals::default();
        let mut aborted = 0;
        for stats in &tasks {
            match stats.outcome {
                TaskOutcome::Finished { turnaround, wait } => {
                    totals.turnaround += turnaround;
                    totals.wait += wait;
                }
                TaskOutcome::Aborted => aborted += 1,
            }
        }

        Self {
            manager,
            tasks,
            totals,
            final_cycle:        state.clock.current,
            cycles:             state.clock.executed,
            deadlocks:          episodes.len(),
            multiple_deadlocks: episodes.iter().any(RecoveryEpisode::is_multiple),
            aborted,
        }
    }

    pub fn stats(&self, task: TaskId) -> Option<&TaskStats> {
        self.tasks.get(task.index())
    }
}
