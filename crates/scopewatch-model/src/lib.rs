//! scopewatch-model — the normalized metric representation.
//!
//! Everything the upstream APIs return is converted into a [`Metric`]
//! before it ever reaches the serving path. The conversion functions in
//! this crate are pure: no I/O, no partial failure modes beyond the
//! fixed cardinality guarantees (a score bundle always yields exactly
//! six metrics, a download count yields at most one).

pub mod metric;
pub mod upstream;

pub use metric::{score_metrics, Metric, ScoreKind, Snapshot};
pub use upstream::{DailyDownloads, DownloadCount, PackageId, ScoreBundle};
