//! `rm-sim` — cycle engine for the `rust_rm` resource-manager simulator.
//!
//! # Cycle loop
//!
//! ```text
//! until every task is Terminated or Aborted:
//!   ① Flush     — units released last cycle become available.
//!   ② Retry     — re-attempt blocked steps, oldest first.
//!   ③ Unblock   — drop the ones that succeeded from the blocked set.
//!   ④ Fresh     — each remaining live task runs its next step,
//!                 ascending TaskId.
//!   ⑤ Recover   — while every live task is blocked:
//!                   abort a victim → speculative retest.
//!   ⑥ Advance   — clock + 1.
//! ```
//!
//! Step handling is split into a pure [`evaluate`] and
//! [`SimulationState::commit`].  The speculative retest in ⑤ evaluates
//! against `&SimulationState` and never commits.
//!
//! # Managers
//!
//! | [`ManagerKind`] | Policy              | Request rule                          |
//! |-----------------|---------------------|---------------------------------------|
//! | `Opportunistic` | [`Opportunistic`]   | grant if enough units are free        |
//! | `Banker`        | [`Banker`]          | grant if free and the result is safe  |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use rm_core::SimConfig;
//! use rm_sim::{ManagerKind, NoopObserver, run_simulation};
//!
//! let workload = rm_workload::load_workload_path(path)?;
//! for kind in ManagerKind::ALL {
//!     let report = run_simulation(kind, &workload, &SimConfig::default(), &mut NoopObserver)?;
//! }
//! ```

pub mod builder;
pub mod engine;
pub mod error;
pub mod manager;
pub mod observer;
pub mod outcome;
pub mod policy;
pub mod recovery;
pub mod report;
pub mod resource;
pub mod state;
pub mod task;


pub use builder::EngineBuilder;
pub use engine::Engine;
pub use error::{SimError, SimResult};
pub use manager::{ManagerKind, run_simulation};
pub use observer::{CycleSummary, NoopObserver, SimObserver};
pub use outcome::{AbortReason, Effect, Outcome, evaluate};
pub use policy::{Admission, AdmissionPolicy, Banker, Opportunistic};
pub use recovery::{RecoveryEpisode, SpeculativeCycle};
pub use report::{RunReport, TaskOutcome, TaskStats, Totals, wait_percent};
pub use resource::Resource;
pub use state::{BlockedStep, SimulationState, StepFlags};
pub use task::{Task, TaskStatus};
