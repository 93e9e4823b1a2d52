//! Plain data row types written by output backends.

use serde::Serialize;

use rm_core::Cycle;
use rm_sim::{CycleSummary, ManagerKind, Resource, TaskOutcome, TaskStats, Totals};

/// One task's statistics, or the run totals when `task` is empty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TaskRow {
    pub manager:      &'static str,
    /// 1-based task number; `None` on the totals row.
    pub task:         Option<u64>,
    /// `finished`, `aborted`, or `total`.
    pub outcome:      &'static str,
    pub turnaround:   Option<u64>,
    pub wait:         Option<u64>,
    pub wait_percent: Option<f64>,
}

impl TaskRow {
    pub fn from_stats(manager: ManagerKind, stats: &TaskStats) -> Self {
        let (outcome, turnaround, wait) = match stats.outcome {
            TaskOutcome::Finished { turnaround, wait } => ("finished", Some(turnaround), Some(wait)),
            TaskOutcome::Aborted => ("aborted", None, None),
        };
        Self {
            manager: manager.label(),
            task: Some(stats.task.number()),
            outcome,
            turnaround,
            wait,
            wait_percent: stats.wait_percent(),
        }
    }

    pub fn totals(manager: ManagerKind, totals: &Totals) -> Self {
        Self {
            manager:      manager.label(),
            task:         None,
            outcome:      "total",
            turnaround:   Some(totals.turnaround),
            wait:         Some(totals.wait),
            wait_percent: Some(totals.wait_percent()),
        }
    }
}

/// What happened in one real cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CycleSummaryRow {
    pub manager:   &'static str,
    pub cycle:     u64,
    pub retried:   u64,
    pub unblocked: u64,
    pub executed:  u64,
    pub blocked:   u64,
    pub aborted:   u64,
    pub finished:  u64,
}

impl CycleSummaryRow {
    pub fn new(manager: ManagerKind, summary: &CycleSummary) -> Self {
        Self {
            manager:   manager.label(),
            cycle:     summary.cycle.0,
            retried:   summary.retried as u64,
            unblocked: summary.unblocked as u64,
            executed:  summary.executed as u64,
            blocked:   summary.blocked as u64,
            aborted:   summary.victims.len() as u64,
            finished:  summary.finished as u64,
        }
    }
}

/// One resource's counters at a snapshot cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResourceSnapshotRow {
    pub manager:   &'static str,
    pub cycle:     u64,
    /// 1-based resource number.
    pub resource:  u64,
    pub total:     u32,
    pub available: u32,
    pub pending:   u32,
    pub holders:   u32,
}

impl ResourceSnapshotRow {
    pub fn new(manager: ManagerKind, cycle: Cycle, resource: &Resource) -> Self {
        Self {
            manager:   manager.label(),
            cycle:     cycle.0,
            resource:  resource.id.number(),
            total:     resource.total,
            available: resource.available(),
            pending:   resource.pending(),
            holders:   resource.holders().len() as u32,
        }
    }
}
