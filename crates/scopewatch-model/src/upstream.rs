//! Wire types for the upstream APIs.
//!
//! These mirror the JSON shapes returned by the npm registry search
//! endpoint, the npm downloads endpoint, and the socket.dev score
//! endpoint. Missing fields decode to their defaults rather than
//! failing the whole response.

use serde::{Deserialize, Serialize};

use crate::metric::ScoreKind;

// ── Package identity ───────────────────────────────────────────────

/// A package name + version pair from the registry listing.
///
/// This is the join key between the score fetch and the download fetch
/// within a single collection cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PackageId {
    pub name: String,
    pub version: String,
}

impl PackageId {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl std::fmt::Display for PackageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

// ── Registry search response ───────────────────────────────────────

/// Response body of `GET /-/v1/search?text=scope:<scope>&size=<n>`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SearchResponse {
    #[serde(default)]
    pub objects: Vec<SearchObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchObject {
    pub package: PackageId,
}

impl SearchResponse {
    /// Flatten the search envelope into the package list.
    pub fn into_packages(self) -> Vec<PackageId> {
        self.objects.into_iter().map(|o| o.package).collect()
    }
}

// ── Score bundle ───────────────────────────────────────────────────

/// A single nested `{"score": f}` object in the socket.dev response.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct ScoreValue {
    #[serde(default)]
    pub score: f64,
}

/// Response body of `GET /v0/npm/<name>/<version>/score`.
///
/// Six independent score dimensions. The exporter does not validate
/// the numeric range (the API has served both 0–1 and 0–100 scales),
/// only the type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ScoreBundle {
    #[serde(rename = "supplyChainRisk", default)]
    pub supply_chain_risk: ScoreValue,
    #[serde(default)]
    pub quality: ScoreValue,
    #[serde(default)]
    pub maintenance: ScoreValue,
    #[serde(default)]
    pub vulnerability: ScoreValue,
    #[serde(default)]
    pub license: ScoreValue,
    #[serde(default)]
    pub miscellaneous: ScoreValue,
}

impl ScoreBundle {
    /// Look up the score for one dimension.
    pub fn score(&self, kind: ScoreKind) -> f64 {
        match kind {
            ScoreKind::SupplyChainRisk => self.supply_chain_risk.score,
            ScoreKind::Quality => self.quality.score,
            ScoreKind::Maintenance => self.maintenance.score,
            ScoreKind::Vulnerability => self.vulnerability.score,
            ScoreKind::License => self.license.score,
            ScoreKind::Miscellaneous => self.miscellaneous.score,
        }
    }
}

// ── Download counts ────────────────────────────────────────────────

/// One daily bucket in the downloads response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct DailyDownloads {
    #[serde(default)]
    pub downloads: u64,
    #[serde(default)]
    pub day: String,
}

/// Response body of `GET /downloads/range/last-day/<name>`.
///
/// The bucket list may be empty for packages with no reporting data;
/// that is a valid "no data" state, not an error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DownloadCount {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    #[serde(default)]
    pub package: String,
    #[serde(default)]
    pub downloads: Vec<DailyDownloads>,
}

impl DownloadCount {
    /// The first daily bucket, if the API reported any.
    pub fn latest(&self) -> Option<&DailyDownloads> {
        self.downloads.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_response_decodes() {
        let body = r#"{"objects":[{"package":{"name":"@celo/base","version":"1.2.3"}},{"package":{"name":"@celo/utils","version":"4.5.6"}}]}"#;
        let resp: SearchResponse = serde_json::from_str(body).unwrap();
        let packages = resp.into_packages();
        assert_eq!(
            packages,
            vec![
                PackageId::new("@celo/base", "1.2.3"),
                PackageId::new("@celo/utils", "4.5.6"),
            ]
        );
    }

    #[test]
    fn search_response_tolerates_empty_objects() {
        let resp: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.into_packages().is_empty());
    }

    #[test]
    fn score_bundle_decodes_camel_case_key() {
        let body = r#"{
            "supplyChainRisk": {"score": 0.9},
            "quality": {"score": 0.8},
            "maintenance": {"score": 0.7},
            "vulnerability": {"score": 0.6},
            "license": {"score": 0.5},
            "miscellaneous": {"score": 0.4}
        }"#;
        let bundle: ScoreBundle = serde_json::from_str(body).unwrap();
        assert_eq!(bundle.score(ScoreKind::SupplyChainRisk), 0.9);
        assert_eq!(bundle.score(ScoreKind::Miscellaneous), 0.4);
    }

    #[test]
    fn score_bundle_defaults_missing_dimensions() {
        let bundle: ScoreBundle =
            serde_json::from_str(r#"{"quality": {"score": 1.0}}"#).unwrap();
        assert_eq!(bundle.score(ScoreKind::Quality), 1.0);
        assert_eq!(bundle.score(ScoreKind::License), 0.0);
    }

    #[test]
    fn download_count_latest_is_first_bucket() {
        let body = r#"{
            "start": "2024-01-01",
            "end": "2024-01-01",
            "package": "@celo/base",
            "downloads": [
                {"downloads": 42, "day": "2024-01-01"},
                {"downloads": 7, "day": "2023-12-31"}
            ]
        }"#;
        let count: DownloadCount = serde_json::from_str(body).unwrap();
        let latest = count.latest().unwrap();
        assert_eq!(latest.downloads, 42);
        assert_eq!(latest.day, "2024-01-01");
    }

    #[test]
    fn download_count_empty_buckets() {
        let count: DownloadCount =
            serde_json::from_str(r#"{"end": "2024-01-01", "downloads": []}"#).unwrap();
        assert!(count.latest().is_none());
        assert_eq!(count.end, "2024-01-01");
    }

    #[test]
    fn package_id_display() {
        assert_eq!(PackageId::new("@celo/base", "1.0.0").to_string(), "@celo/base@1.0.0");
    }
}
