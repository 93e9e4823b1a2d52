//! Simulation time model.
//!
//! Time is a monotonically increasing `Cycle` counter.  The engine advances
//! it once per real cycle; `compute` steps advance it further by their
//! duration.  There is no wall-clock mapping: a cycle is the unit of every
//! statistic the simulator reports.

use std::fmt;

// ── Cycle ─────────────────────────────────────────────────────────────────────

/// An absolute simulation cycle.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cycle(pub u64);

impl Cycle {
    pub const ZERO: Cycle = Cycle(0);

    /// Cycles elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn since(self, earlier: Cycle) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Cycle {
    type Output = Cycle;
    #[inline]
    fn add(self, rhs: u64) -> Cycle {
        Cycle(self.0 + rhs)
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The run's clock.  Cheap to copy; holds no heap data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// The current cycle.
    pub current: Cycle,
    /// Real cycles executed so far.  Unlike `current`, `compute` steps do
    /// not move this counter, so it is what `SimConfig::max_cycles` bounds.
    pub executed: u64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Close out one real cycle.
    #[inline]
    pub fn advance(&mut self) {
        self.current = self.current + 1;
        self.executed += 1;
    }

    /// Jump forward by `cycles` without counting a real cycle.
    #[inline]
    pub fn advance_by(&mut self, cycles: u64) {
        self.current = self.current + cycles;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} executed)", self.current, self.executed)
    }
}
