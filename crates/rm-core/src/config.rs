//! Run configuration.

use crate::{RmError, RmResult};

/// Top-level simulation configuration.
///
/// Built by the application (usually from command-line flags) and handed to
/// every manager run unchanged, so the two runs over one workload see the
/// same limits.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Upper bound on real cycles per run.  A well-formed workload always
    /// finishes long before this; hitting it means the run stopped making
    /// progress and is reported as an error.
    pub max_cycles: u64,

    /// Emit a resource snapshot to the observer every N cycles.
    /// 0 disables snapshots.
    pub snapshot_interval_cycles: u64,
}

impl SimConfig {
    /// Default cycle limit.
    pub const DEFAULT_MAX_CYCLES: u64 = 100_000;

    /// Reject configurations that cannot produce a run.
    pub fn validate(&self) -> RmResult<()> {
        if self.max_cycles == 0 {
            return Err(RmError::Config("max_cycles must be at least 1".into()));
        }
        Ok(())
    }

    /// True when a snapshot is due at the end of real cycle `executed`.
    #[inline]
    pub fn snapshot_due(&self, executed: u64) -> bool {
        self.snapshot_interval_cycles > 0 && executed.is_multiple_of(self.snapshot_interval_cycles)
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_cycles:               Self::DEFAULT_MAX_CYCLES,
            snapshot_interval_cycles: 0,
        }
    }
}
