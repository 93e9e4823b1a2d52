use rm_core::{StepId, TaskId};
use thiserror::Error;

use crate::StepKind;

#[derive(Debug, Error)]
pub enum WorkloadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("line {line}: unknown step kind {kind:?}")]
    UnknownStepKind { line: usize, kind: String },

    #[error("line {line}: task {task} is outside 1..={count}")]
    TaskOutOfRange { line: usize, task: u64, count: usize },

    #[error("line {line}: resource {resource} is outside 1..={count}")]
    ResourceOutOfRange { line: usize, resource: u64, count: usize },

    #[error("{step}: {kind} expects a {expected} operand")]
    TargetMismatch {
        step:     StepId,
        kind:     StepKind,
        expected: &'static str,
    },

    #[error("{task} has no steps")]
    EmptyProgram { task: TaskId },

    #[error("{task} must begin with initiate, found {found}")]
    MissingInitiate { task: TaskId, found: StepKind },

    #[error("{task} must end with terminate")]
    MissingTerminate { task: TaskId },

    #[error("{task} has {step} after its terminate step")]
    StepAfterTerminate { task: TaskId, step: StepId },
}

pub type WorkloadResult<T> = Result<T, WorkloadError>;
