use rm_core::{RmError, StepId, TaskId};
use rm_workload::WorkloadError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] RmError),

    #[error(transparent)]
    Workload(#[from] WorkloadError),

    /// A terminated task was asked to run another step.
    #[error("{task} attempted {step} after it terminated")]
    StepAfterTermination { task: TaskId, step: StepId },

    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("run exceeded {limit} cycles with {live} tasks still live")]
    CycleLimit { limit: u64, live: usize },

    #[error("unknown resource manager {0:?}")]
    UnknownManager(String),
}

pub type SimResult<T> = Result<T, SimError>;
