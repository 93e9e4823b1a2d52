//! The human-readable statistics table.
//!
//! ```text
//!         FIFO
//!     Task 1      aborted
//!     Task 2      5   1   20.000000%
//!     Total       5   1   20.000000%
//! ```

use std::io::Write;

use rm_sim::{RunReport, TaskOutcome};

use crate::{OutputResult, ReportWriter};

/// Writes one table per report to `out`.
pub struct TextWriter<W: Write> {
    out: W,
}

impl<W: Write> TextWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportWriter for TextWriter<W> {
    fn write_report(&mut self, report: &RunReport) -> OutputResult<()> {
        writeln!(self.out, "\t\t{}", report.manager.label())?;
        for stats in &report.tasks {
            match stats.outcome {
                TaskOutcome::Finished { turnaround, wait } => writeln!(
                    self.out,
                    "\tTask {}  \t{}\t{}\t{:.6}%",
                    stats.task.number(),
                    turnaround,
                    wait,
                    stats.wait_percent().unwrap_or(0.0),
                )?,
                TaskOutcome::Aborted => {
                    writeln!(self.out, "\tTask {}  \taborted", stats.task.number())?
                }
            }
        }
        writeln!(
            self.out,
            "\tTotal\t\t{}\t{}\t{:.6}%",
            report.totals.turnaround,
            report.totals.wait,
            report.totals.wait_percent(),
        )?;
        if report.multiple_deadlocks {
            writeln!(self.out, "\t(more than one abort was needed to clear a deadlock)")?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.out.flush()?;
        Ok(())
    }
}
