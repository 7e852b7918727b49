//! scopewatch-collector — the polling-and-metric-cache pipeline.
//!
//! # Architecture
//!
//! ```text
//! Scheduler
//!   ├── bootstrap() → one synchronous cycle, fatal on failure
//!   └── run()       → periodic cycles until shutdown
//!         │
//!         ▼
//! Collector::run_cycle()
//!   ├── list packages for the scope      (cycle-fatal on failure)
//!   ├── per package: score + downloads   (failures logged, skipped)
//!   └── convert to metrics, accumulate
//!         │
//!         ▼
//! SnapshotStore
//!   ├── publish() ← wholesale atomic replacement per cycle
//!   └── read()    ← wait-free, used by the scrape path
//! ```
//!
//! The scrape path only ever touches [`SnapshotStore::read`], so a slow
//! or failing refresh cycle never delays a scrape.

pub mod cycle;
pub mod scheduler;
pub mod store;

pub use cycle::{Collector, CycleError};
pub use scheduler::Scheduler;
pub use store::SnapshotStore;
