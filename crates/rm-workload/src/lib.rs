//! `rm-workload` — the static side of a simulation: task programs and the
//! loader that reads them from a workload file.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`step`]     | `Step`, `StepKind`, `StepTarget`                           |
//! | [`program`]  | `Program` (linked step arena), `Workload`                  |
//! | [`loader`]   | `parse_workload`, `load_workload_reader`, `load_workload_path` |
//! | [`error`]    | `WorkloadError`, `WorkloadResult<T>`                       |
//!
//! # Program model (summary)
//!
//! Steps are stored in file order in one arena.  Each step links to the next
//! and previous step *of the same task*:
//!
//! ```text
//! arena:   0:init T1  1:init T2  2:req T1  3:req T2  4:term T1  5:term T2
//! T1:      0 ──► 2 ──► 4
//! T2:      1 ──► 3 ──► 5
//! ```
//!
//! Nothing here changes once loaded; the engine keeps its own cursor into the
//! arena for each task.

pub mod error;
pub mod loader;
pub mod program;
pub mod step;

#[cfg(test)]
mod tests;

pub use error::{WorkloadError, WorkloadResult};
pub use loader::{load_workload_path, load_workload_reader, parse_workload};
pub use program::{Program, Workload};
pub use step::{Step, StepKind, StepTarget};
