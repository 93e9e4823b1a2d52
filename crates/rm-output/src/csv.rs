//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `task_stats.csv`
//! - `cycle_summaries.csv`
//! - `resource_snapshots.csv`

use std::fs::File;
use std::path::Path;

use csv::{Writer, WriterBuilder};
use serde::Serialize;

use rm_sim::RunReport;

use crate::writer::ReportWriter;
use crate::{CycleSummaryRow, OutputResult, ResourceSnapshotRow, TaskRow};

pub const TASK_STATS_HEADER: [&str; 6] =
    ["manager", "task", "outcome", "turnaround", "wait", "wait_percent"];
pub const CYCLE_SUMMARY_HEADER: [&str; 8] =
    ["manager", "cycle", "retried", "unblocked", "executed", "blocked", "aborted", "finished"];
pub const RESOURCE_SNAPSHOT_HEADER: [&str; 7] =
    ["manager", "cycle", "resource", "total", "available", "pending", "holders"];

/// Writes run output to three CSV files.
pub struct CsvWriter {
    tasks:     Writer<File>,
    summaries: Writer<File>,
    snapshots: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create the three CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        Ok(Self {
            tasks:     open(dir, "task_stats.csv", &TASK_STATS_HEADER)?,
            summaries: open(dir, "cycle_summaries.csv", &CYCLE_SUMMARY_HEADER)?,
            snapshots: open(dir, "resource_snapshots.csv", &RESOURCE_SNAPSHOT_HEADER)?,
            finished:  false,
        })
    }
}

fn open(dir: &Path, name: &str, header: &[&str]) -> OutputResult<Writer<File>> {
    // Headers are written eagerly so an empty table still has one.
    let mut writer = WriterBuilder::new().has_headers(false).from_path(dir.join(name))?;
    writer.write_record(header)?;
    Ok(writer)
}

fn write_rows<T: Serialize>(writer: &mut Writer<File>, rows: &[T]) -> OutputResult<()> {
    for row in rows {
        writer.serialize(row)?;
    }
    Ok(())
}

impl ReportWriter for CsvWriter {
    fn write_report(&mut self, report: &RunReport) -> OutputResult<()> {
        let mut rows: Vec<TaskRow> = report
            .tasks
            .iter()
            .map(|stats| TaskRow::from_stats(report.manager, stats))
            .collect();
        rows.push(TaskRow::totals(report.manager, &report.totals));
        write_rows(&mut self.tasks, &rows)
    }

    fn write_cycle_summary(&mut self, row: &CycleSummaryRow) -> OutputResult<()> {
        self.summaries.serialize(row)?;
        Ok(())
    }

    fn write_snapshots(&mut self, rows: &[ResourceSnapshotRow]) -> OutputResult<()> {
        write_rows(&mut self.snapshots, rows)
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.tasks.flush()?;
        self.summaries.flush()?;
        self.snapshots.flush()?;
        Ok(())
    }
}
