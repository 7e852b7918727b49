//! Snapshot store — the only state shared between the refresh task and
//! the scrape path.
//!
//! The current snapshot is held in an `ArcSwap` and replaced wholesale
//! at the end of each completed cycle, never mutated in place. Readers
//! load the full `Arc` without locking, so concurrent scrapes never
//! contend with an in-progress cycle and never observe a torn mix of
//! two cycles.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwap;
use scopewatch_model::{Metric, Snapshot};

/// Holder of the most recently completed cycle's metric set.
///
/// There is one writer (the scheduler) and arbitrarily many readers.
#[derive(Debug)]
pub struct SnapshotStore {
    current: ArcSwap<Snapshot>,
    cycles: AtomicU64,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore {
    /// A store with the empty pre-first-cycle snapshot.
    pub fn new() -> Self {
        Self {
            current: ArcSwap::new(Arc::new(Snapshot::empty())),
            cycles: AtomicU64::new(0),
        }
    }

    /// A shared handle, for handing to both the scheduler and the
    /// serving router.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Replace the visible snapshot with a completed cycle's result.
    ///
    /// Returns the cycle number assigned to the new snapshot.
    pub fn publish(&self, metrics: Vec<Metric>) -> u64 {
        let cycle = self.cycles.fetch_add(1, Ordering::Relaxed) + 1;
        self.current.store(Arc::new(Snapshot { cycle, metrics }));
        cycle
    }

    /// The current snapshot, without waiting on any in-progress cycle.
    pub fn read(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }
}
