//! `rm-core` — foundational types for the `rust_rm` resource-manager simulator.
//!
//! This crate is a dependency of every other `rm-*` crate.  It has no `rm-*`
//! dependencies and a single required external one (`thiserror`), plus
//! optional `serde`.
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `TaskId`, `ResourceId`, `StepId`                      |
//! | [`time`]        | `Cycle`, `SimClock`                                   |
//! | [`config`]      | `SimConfig`                                           |
//! | [`error`]       | `RmError`, `RmResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod ids;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::SimConfig;
pub use error::{RmError, RmResult};
pub use ids::{ResourceId, StepId, TaskId};
pub use time::{Cycle, SimClock};
