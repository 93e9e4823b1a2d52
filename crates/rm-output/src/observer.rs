//! `ReportObserver<W>` — bridges `SimObserver` to a `ReportWriter`.

use rm_core::Cycle;
use rm_sim::{CycleSummary, ManagerKind, RunReport, SimObserver, SimulationState};

use crate::row::{CycleSummaryRow, ResourceSnapshotRow};
use crate::writer::ReportWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes cycle summaries, resource snapshots and
/// the final report to any [`ReportWriter`].
///
/// The writer is borrowed so one writer can collect both manager runs;
/// call [`ReportWriter::finish`] once after the last run.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After the run returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct ReportObserver<'a, W: ReportWriter> {
    writer:     &'a mut W,
    manager:    ManagerKind,
    last_error: Option<OutputError>,
}

impl<'a, W: ReportWriter> ReportObserver<'a, W> {
    pub fn new(writer: &'a mut W, manager: ManagerKind) -> Self {
        Self { writer, manager, last_error: None }
    }

    /// Take the stored write error (if any) after the run returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: ReportWriter> SimObserver for ReportObserver<'_, W> {
    fn on_cycle_end(&mut self, summary: &CycleSummary) {
        let row = CycleSummaryRow::new(self.manager, summary);
        let result = self.writer.write_cycle_summary(&row);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, cycle: Cycle, state: &SimulationState) {
        let rows: Vec<ResourceSnapshotRow> = state
            .resources
            .iter()
            .map(|r| ResourceSnapshotRow::new(self.manager, cycle, r))
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }
    }

    fn on_run_end(&mut self, report: &RunReport) {
        let result = self.writer.write_report(report);
        self.store_err(result);
    }
}
