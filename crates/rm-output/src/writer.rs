//! The `ReportWriter` trait implemented by all backend writers.

use rm_sim::RunReport;

use crate::{CycleSummaryRow, OutputResult, ResourceSnapshotRow};

/// Trait implemented by the text and CSV writers.
///
/// One writer may receive several runs (one per manager); rows carry the
/// manager label.  Errors surface through
/// [`ReportObserver::take_error`][crate::ReportObserver::take_error] when the
/// writer is driven by an observer.
pub trait ReportWriter {
    /// Write the end-of-run statistics.
    fn write_report(&mut self, report: &RunReport) -> OutputResult<()>;

    /// Write one cycle summary row.  Backends without a per-cycle table
    /// ignore it.
    fn write_cycle_summary(&mut self, _row: &CycleSummaryRow) -> OutputResult<()> {
        Ok(())
    }

    /// Write a batch of resource snapshot rows.
    fn write_snapshots(&mut self, _rows: &[ResourceSnapshotRow]) -> OutputResult<()> {
        Ok(())
    }

    /// Flush all underlying outputs.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
