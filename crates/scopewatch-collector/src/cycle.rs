//! The collection cycle.
//!
//! One cycle lists the scope's packages, then fetches each package's
//! score bundle and (optionally) download count sequentially. Fetches
//! run one at a time to keep outstanding connections to the
//! rate-limited upstreams bounded to one; the refresh period must stay
//! well above `package_count × worst-case per-package latency`.
//!
//! A single package's failure never aborts the cycle. Only the listing
//! call is cycle-fatal, because without it there is nothing to iterate.

use scopewatch_client::{ClientError, RegistryClient, SocketClient};
use scopewatch_model::{score_metrics, Metric};
use thiserror::Error;
use tracing::{info, warn};

/// A whole-cycle failure. Package-level failures never escalate here.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("package listing failed: {0}")]
    Listing(#[source] ClientError),
}

/// Runs collection cycles for one npm scope.
pub struct Collector {
    registry: RegistryClient,
    socket: SocketClient,
    scope: String,
    max_packages: Option<usize>,
    downloads: bool,
}

impl Collector {
    /// A collector with downloads enabled and no package limit.
    pub fn new(registry: RegistryClient, socket: SocketClient, scope: impl Into<String>) -> Self {
        Self {
            registry,
            socket,
            scope: scope.into(),
            max_packages: None,
            downloads: true,
        }
    }

    /// Cap the cycle to the first `limit` packages of the listing.
    pub fn with_max_packages(mut self, limit: Option<usize>) -> Self {
        self.max_packages = limit;
        self
    }

    /// Enable or disable the download-count fetch per package.
    pub fn with_downloads(mut self, enabled: bool) -> Self {
        self.downloads = enabled;
        self
    }

    /// Run one complete cycle and return its metric set.
    ///
    /// A cycle with zero per-package successes is still a valid, empty
    /// result; only a listing failure is an error.
    pub async fn run_cycle(&self) -> Result<Vec<Metric>, CycleError> {
        let mut packages = self
            .registry
            .search_scope(&self.scope)
            .await
            .map_err(CycleError::Listing)?;

        if let Some(limit) = self.max_packages {
            packages.truncate(limit);
        }
        info!(
            scope = %self.scope,
            packages = packages.len(),
            "collection cycle started"
        );

        let mut metrics = Vec::new();
        let mut score_failures = 0usize;

        for package in &packages {
            match self.socket.score(package).await {
                Ok(bundle) => accumulate(&mut metrics, score_metrics(package, &bundle)),
                Err(e) => {
                    score_failures += 1;
                    warn!(package = %package, error = %e, "score fetch failed, skipping package scores");
                }
            }

            // A score failure must not suppress the download fetch, and
            // vice versa.
            if self.downloads {
                match self.registry.download_count(&package.name).await {
                    Ok(count) => {
                        let metric = match count.latest() {
                            Some(bucket) => Metric::Download {
                                package: package.name.clone(),
                                date: bucket.day.clone(),
                                value: bucket.downloads,
                            },
                            None => {
                                warn!(package = %package.name, "empty download count, exporting zero");
                                Metric::Download {
                                    package: package.name.clone(),
                                    date: count.end.clone(),
                                    value: 0,
                                }
                            }
                        };
                        accumulate(&mut metrics, vec![metric]);
                    }
                    Err(e) => {
                        warn!(package = %package.name, error = %e, "download count fetch failed, skipping download metric");
                    }
                }
            }
        }

        info!(
            scope = %self.scope,
            metrics = metrics.len(),
            packages = packages.len(),
            score_failures,
            "collection cycle finished"
        );
        Ok(metrics)
    }
}

/// Append metrics, dropping (and logging) any non-finite value rather
/// than zero-filling it silently.
fn accumulate(acc: &mut Vec<Metric>, batch: Vec<Metric>) {
    for metric in batch {
        if metric.is_finite() {
            acc.push(metric);
        } else {
            warn!(?metric, "dropping metric with non-finite value");
        }
    }
}
