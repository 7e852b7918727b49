//! The exported metric representation.
//!
//! A [`Metric`] is the single normalized unit the serving path knows
//! about. Upstream responses are converted here and nowhere else;
//! label rendering to strings happens only at the serving boundary.

use serde::{Deserialize, Serialize};

use crate::upstream::{PackageId, ScoreBundle};

// ── Score dimensions ───────────────────────────────────────────────

/// The six socket.dev score dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreKind {
    SupplyChainRisk,
    Quality,
    Maintenance,
    Vulnerability,
    License,
    Miscellaneous,
}

impl ScoreKind {
    /// All dimensions, in the order they are emitted per package.
    pub const ALL: [ScoreKind; 6] = [
        ScoreKind::SupplyChainRisk,
        ScoreKind::Quality,
        ScoreKind::Maintenance,
        ScoreKind::Vulnerability,
        ScoreKind::License,
        ScoreKind::Miscellaneous,
    ];

    /// The value of the `score` label on the exported gauge.
    pub fn as_label(self) -> &'static str {
        match self {
            ScoreKind::SupplyChainRisk => "supplychainrisk",
            ScoreKind::Quality => "quality",
            ScoreKind::Maintenance => "maintenance",
            ScoreKind::Vulnerability => "vulnerability",
            ScoreKind::License => "license",
            ScoreKind::Miscellaneous => "miscellaneous",
        }
    }
}

// ── Metric ─────────────────────────────────────────────────────────

/// One exported gauge sample.
///
/// Labels stay strongly typed here; they are formatted into exposition
/// text only by the serving layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Metric {
    /// A `socket_score` gauge sample.
    Score {
        package: String,
        version: String,
        score: ScoreKind,
        value: f64,
    },
    /// An `npm_download_count` gauge sample.
    Download {
        package: String,
        date: String,
        value: u64,
    },
}

impl Metric {
    /// The numeric value as it will be exported.
    pub fn value(&self) -> f64 {
        match self {
            Metric::Score { value, .. } => *value,
            Metric::Download { value, .. } => *value as f64,
        }
    }

    /// Whether the value is representable as a finite gauge.
    ///
    /// Non-finite values must be dropped (with a log record) by the
    /// accumulator, never exported or silently zero-filled.
    pub fn is_finite(&self) -> bool {
        self.value().is_finite()
    }
}

/// Convert a score bundle into its six gauge samples.
///
/// Total over any well-formed bundle: always exactly six metrics, one
/// per dimension, each carrying the source package's name and version.
pub fn score_metrics(package: &PackageId, bundle: &ScoreBundle) -> Vec<Metric> {
    ScoreKind::ALL
        .iter()
        .map(|&kind| Metric::Score {
            package: package.name.clone(),
            version: package.version.clone(),
            score: kind,
            value: bundle.score(kind),
        })
        .collect()
}

// ── Snapshot ───────────────────────────────────────────────────────

/// One completed collection cycle's metric set.
///
/// The cycle number increases by one per published snapshot, so readers
/// can observe the monotonic ordering guarantee.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Snapshot {
    pub cycle: u64,
    pub metrics: Vec<Metric>,
}

impl Snapshot {
    /// The pre-first-cycle state: the exporter is up but reports nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}
