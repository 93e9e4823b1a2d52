//! Pure step evaluation.
//!
//! [`evaluate`] decides what a step would do against a state without touching
//! it; [`SimulationState::commit`][crate::SimulationState::commit] applies the
//! decision.  Real cycles do both; the speculative retest during deadlock
//! recovery only evaluates.

use std::fmt;

use rm_core::{ResourceId, StepId, TaskId};
use rm_workload::{Step, StepKind};

use crate::{Admission, AdmissionPolicy, SimError, SimResult, SimulationState};

/// Why a task was aborted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AbortReason {
    /// Chosen as the victim of deadlock recovery.
    Deadlock,
    /// Declared a claim larger than the resource's capacity.
    ClaimExceedsCapacity { resource: ResourceId, claim: u32, capacity: u32 },
    /// Asked for more than its declared claim.
    RequestExceedsClaim { resource: ResourceId, requested: u32, claim: u32 },
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::Deadlock => f.write_str("deadlock victim"),
            AbortReason::ClaimExceedsCapacity { resource, claim, capacity } => {
                write!(f, "claim of {claim} exceeds the {capacity} units of {resource}")
            }
            AbortReason::RequestExceedsClaim { resource, requested, claim } => {
                write!(f, "holding would reach {requested} of {resource}, above its claim of {claim}")
            }
        }
    }
}

/// What committing a step does to the state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Initiate: stamp the start cycle (first time only), status Running.
    Start,
    /// Request satisfied.
    Grant { resource: ResourceId, amount: u32 },
    /// Release satisfied; units return at the next cycle's flush.
    Defer { resource: ResourceId, amount: u32 },
    /// Compute: move the clock forward.
    Advance(u32),
    /// Terminate: release everything, stamp the stop cycle.
    Finish,
    /// Request or release that cannot be satisfied now.
    Block,
    /// Refused by the admission policy.
    Abort(AbortReason),
}

/// The evaluated result of one step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub step:   StepId,
    pub task:   TaskId,
    pub effect: Effect,
}

impl Outcome {
    /// Anything but a block counts as progress.
    #[inline]
    pub fn succeeded(&self) -> bool {
        self.effect != Effect::Block
    }
}

/// Decide what `step` would do against `state`.  Never mutates.
pub fn evaluate<P>(policy: &P, state: &SimulationState, step: &Step) -> SimResult<Outcome>
where
    P: AdmissionPolicy + ?Sized,
{
    let effect = match step.kind {
        StepKind::Initiate => match policy.admit_initiate(state, step) {
            Admission::Abort(reason) => Effect::Abort(reason),
            Admission::Grant | Admission::Block => Effect::Start,
        },
        StepKind::Request => {
            let resource = operand(step)?;
            match policy.admit_request(state, step.task, resource, step.amount) {
                Admission::Grant         => Effect::Grant { resource, amount: step.amount },
                Admission::Block         => Effect::Block,
                Admission::Abort(reason) => Effect::Abort(reason),
            }
        }
        StepKind::Release => {
            let resource = operand(step)?;
            if step.amount <= state.task(step.task).held(resource) {
                Effect::Defer { resource, amount: step.amount }
            } else {
                Effect::Block
            }
        }
        StepKind::Compute => Effect::Advance(step.duration().unwrap_or(0)),
        StepKind::Terminate => Effect::Finish,
    };

    Ok(Outcome { step: step.id, task: step.task, effect })
}

fn operand(step: &Step) -> SimResult<ResourceId> {
    step.resource().ok_or_else(|| {
        SimError::InvariantViolation(format!("{step} has no resource operand"))
    })
}
