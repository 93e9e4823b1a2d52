//! A pool of interchangeable units of one resource type.

use rustc_hash::FxHashSet;

use rm_core::{ResourceId, TaskId};

/// Fixed-capacity unit counter plus the set of tasks holding units.
///
/// Units leave the pool through [`allocate`][Self::allocate] and come back
/// either at once ([`release`][Self::release], used by terminate and abort)
/// or at the start of the next cycle ([`defer_release`][Self::defer_release],
/// used by release steps).  At every point
/// `available + pending <= total`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resource {
    pub id:    ResourceId,
    pub total: u32,
    available: u32,
    /// Released this cycle; joins `available` at the next flush.
    pending:   u32,
    holders:   FxHashSet<TaskId>,
}

impl Resource {
    pub fn new(id: ResourceId, total: u32) -> Self {
        Self {
            id,
            total,
            available: total,
            pending:   0,
            holders:   FxHashSet::default(),
        }
    }

    #[inline]
    pub fn available(&self) -> u32 {
        self.available
    }

    #[inline]
    pub fn pending(&self) -> u32 {
        self.pending
    }

    /// Units currently out with tasks.
    #[inline]
    pub fn allocated(&self) -> u32 {
        self.total - self.available - self.pending
    }

    pub fn holders(&self) -> &FxHashSet<TaskId> {
        &self.holders
    }

    pub fn is_held_by(&self, task: TaskId) -> bool {
        self.holders.contains(&task)
    }

    /// Take `amount` units.  Returns `false` (and changes nothing) when fewer
    /// than `amount` are available.
    pub fn allocate(&mut self, amount: u32) -> bool {
        if amount > self.available {
            return false;
        }
        self.available -= amount;
        true
    }

    /// Return `amount` units to the pool immediately.
    pub fn release(&mut self, amount: u32) {
        debug_assert!(self.available + self.pending + amount <= self.total);
        self.available = (self.available + amount).min(self.total - self.pending);
    }

    /// Return `amount` units at the start of the next cycle.
    pub fn defer_release(&mut self, amount: u32) {
        debug_assert!(self.available + self.pending + amount <= self.total);
        self.pending = (self.pending + amount).min(self.total - self.available);
    }

    /// Make deferred units available.  Returns how many were flushed.
    pub fn flush_pending(&mut self) -> u32 {
        let flushed = std::mem::take(&mut self.pending);
        self.available += flushed;
        flushed
    }

    pub fn register_holder(&mut self, task: TaskId) {
        self.holders.insert(task);
    }

    pub fn remove_holder(&mut self, task: TaskId) {
        self.holders.remove(&task);
    }

    /// Back to full capacity with no holders.
    pub fn reset(&mut self) {
        self.available = self.total;
        self.pending = 0;
        self.holders.clear();
    }
}
