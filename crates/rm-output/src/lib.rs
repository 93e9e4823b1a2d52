//! `rm-output` — report writers for the `rust_rm` simulator.
//!
//! Two backends implement [`ReportWriter`]:
//!
//! | Backend        | Output                                                          |
//! |----------------|-----------------------------------------------------------------|
//! | [`TextWriter`] | the per-manager statistics table, to any `io::Write`            |
//! | [`CsvWriter`]  | `task_stats.csv`, `cycle_summaries.csv`, `resource_snapshots.csv` |
//!
//! [`ReportObserver`] implements `rm_sim::SimObserver` and feeds a writer
//! while a run progresses.
//!
//! # Usage
//!
//! ```rust,ignore
//! use rm_output::{CsvWriter, ReportObserver, ReportWriter};
//!
//! let mut writer = CsvWriter::new(Path::new("./out"))?;
//! for kind in ManagerKind::ALL {
//!     let mut obs = ReportObserver::new(&mut writer, kind);
//!     run_simulation(kind, &workload, &config, &mut obs)?;
//!     if let Some(e) = obs.take_error() { eprintln!("output error: {e}"); }
//! }
//! writer.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod text;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::ReportObserver;
pub use row::{CycleSummaryRow, ResourceSnapshotRow, TaskRow};
pub use text::TextWriter;
pub use writer::ReportWriter;
