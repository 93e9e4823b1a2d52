//! Admission policies: the seam between the cycle engine and a manager's
//! rules for granting requests.

use rm_core::{ResourceId, TaskId};
use rm_workload::{Step, StepKind, Workload};

use crate::{AbortReason, ManagerKind, SimulationState};

/// A policy's answer to an initiate or request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Admission {
    Grant,
    Block,
    Abort(AbortReason),
}

/// Decides whether resource requests may proceed.
///
/// Policies only read the state; the engine applies the decision.  Release,
/// compute and terminate are the same under every policy and never reach
/// this trait.
pub trait AdmissionPolicy {
    /// The manager this policy implements (used to label reports).
    fn kind(&self) -> ManagerKind;

    /// Called for every initiate step.  The default admits everything.
    fn admit_initiate(&self, _state: &SimulationState, _step: &Step) -> Admission {
        Admission::Grant
    }

    /// Called for every request step, including retries of blocked ones.
    fn admit_request(
        &self,
        state:    &SimulationState,
        task:     TaskId,
        resource: ResourceId,
        amount:   u32,
    ) -> Admission;
}

// ── Opportunistic ─────────────────────────────────────────────────────────────

/// First come, first served: grant whenever enough units are free.  Can
/// deadlock; the engine's recovery handles that.
#[derive(Copy, Clone, Debug, Default)]
pub struct Opportunistic;

impl AdmissionPolicy for Opportunistic {
    fn kind(&self) -> ManagerKind {
        ManagerKind::Opportunistic
    }

    fn admit_request(
        &self,
        state:    &SimulationState,
        _task:    TaskId,
        resource: ResourceId,
        amount:   u32,
    ) -> Admission {
        if state.resource(resource).available() >= amount {
            Admission::Grant
        } else {
            Admission::Block
        }
    }
}

// ── Banker ────────────────────────────────────────────────────────────────────

/// Banker's algorithm: every task declares its maximum claim per resource
/// through its initiate steps, and a request is granted only if the state
/// afterwards is safe.
#[derive(Clone, Debug)]
pub struct Banker {
    /// `claims[task][resource]`, clamped to capacity.  Tasks whose declared
    /// claim exceeds capacity are aborted at initiate, so the clamp only
    /// keeps them from poisoning safety checks before that happens.
    claims: Vec<Vec<u32>>,
}

impl Banker {
    /// Collect claims from every initiate step of the workload.
    pub fn new(workload: &Workload) -> Self {
        let mut claims = vec![vec![0u32; workload.resource_count()]; workload.task_count()];
        for step in workload.program.steps() {
            if step.kind != StepKind::Initiate {
                continue;
            }
            let Some(resource) = step.resource() else { continue };
            let claim = step.amount.min(workload.capacity(resource));
            let slot = &mut claims[step.task.index()][resource.index()];
            *slot = (*slot).max(claim);
        }
        Self { claims }
    }

    #[inline]
    pub fn claim(&self, task: TaskId, resource: ResourceId) -> u32 {
        self.claims[task.index()][resource.index()]
    }

    /// True if every live task can still run to completion in some order
    /// after `task` receives `amount` more units of `resource`.
    ///
    /// Deferred releases count as free: they return next cycle whatever
    /// happens.
    pub fn is_safe_after(
        &self,
        state:    &SimulationState,
        task:     TaskId,
        resource: ResourceId,
        amount:   u32,
    ) -> bool {
        let mut work: Vec<u64> = state
            .resources
            .iter()
            .map(|r| u64::from(r.available()) + u64::from(r.pending()))
            .collect();
        work[resource.index()] = work[resource.index()].saturating_sub(u64::from(amount));

        let held = |t: TaskId, r: ResourceId| -> u64 {
            let extra = if t == task && r == resource { amount } else { 0 };
            u64::from(state.task(t).held(r)) + u64::from(extra)
        };

        let mut unfinished: Vec<TaskId> = state
            .tasks
            .iter()
            .filter(|t| t.status.is_live())
            .map(|t| t.id)
            .collect();

        while !unfinished.is_empty() {
            let before = unfinished.len();
            unfinished.retain(|&t| {
                let can_finish = state.resources.iter().all(|r| {
                    u64::from(self.claim(t, r.id)).saturating_sub(held(t, r.id)) <= work[r.id.index()]
                });
                if can_finish {
                    for r in &state.resources {
                        work[r.id.index()] += held(t, r.id);
                    }
                }
                !can_finish
            });
            if unfinished.len() == before {
                return false;
            }
        }
        true
    }
}

impl AdmissionPolicy for Banker {
    fn kind(&self) -> ManagerKind {
        ManagerKind::Banker
    }

    fn admit_initiate(&self, state: &SimulationState, step: &Step) -> Admission {
        let Some(resource) = step.resource() else {
            return Admission::Grant;
        };
        let capacity = state.resource(resource).total;
        if step.amount > capacity {
            return Admission::Abort(AbortReason::ClaimExceedsCapacity {
                resource,
                claim: step.amount,
                capacity,
            });
        }
        Admission::Grant
    }

    fn admit_request(
        &self,
        state:    &SimulationState,
        task:     TaskId,
        resource: ResourceId,
        amount:   u32,
    ) -> Admission {
        let claim = self.claim(task, resource);
        let requested = state.task(task).held(resource).saturating_add(amount);
        if requested > claim {
            return Admission::Abort(AbortReason::RequestExceedsClaim { resource, requested, claim });
        }
        if state.resource(resource).available() < amount {
            return Admission::Block;
        }
        if self.is_safe_after(state, task, resource, amount) {
            Admission::Grant
        } else {
            Admission::Block
        }
    }
}
