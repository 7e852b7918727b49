//! npm registry and downloads API client.

use scopewatch_model::{DownloadCount, PackageId};
use scopewatch_model::upstream::SearchResponse;
use tracing::info;

use crate::error::ClientResult;
use crate::transport::Transport;

/// Production base URL of the registry search API.
const SEARCH_BASE: &str = "https://registry.npmjs.org";

/// Production base URL of the downloads API.
const DOWNLOADS_BASE: &str = "https://api.npmjs.org";

/// Packages returned per search request. Only the first page is ever
/// read; scopes with more packages than this are truncated. Known
/// limitation carried over from the original exporter.
const PAGE_SIZE: u32 = 100;

/// Client for the npm registry search and downloads endpoints.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    transport: Transport,
    search_base: String,
    downloads_base: String,
}

impl RegistryClient {
    /// Client pointed at the production npm endpoints.
    pub fn new(transport: Transport) -> Self {
        Self::with_base_urls(transport, SEARCH_BASE, DOWNLOADS_BASE)
    }

    /// Client with explicit base URLs (used by tests).
    pub fn with_base_urls(
        transport: Transport,
        search_base: impl Into<String>,
        downloads_base: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            search_base: search_base.into(),
            downloads_base: downloads_base.into(),
        }
    }

    /// List packages under `scope`, in the registry's result order.
    pub async fn search_scope(&self, scope: &str) -> ClientResult<Vec<PackageId>> {
        let url = format!(
            "{}/-/v1/search?text=scope:{scope}&size={PAGE_SIZE}",
            self.search_base
        );
        info!(scope, "listing packages from npm registry");

        let resp: SearchResponse = self.transport.get_json(&url, |r| r).await?;
        Ok(resp.into_packages())
    }

    /// Fetch the last-day download buckets for a package.
    pub async fn download_count(&self, name: &str) -> ClientResult<DownloadCount> {
        let url = format!("{}/downloads/range/last-day/{name}", self.downloads_base);
        self.transport.get_json(&url, |r| r).await
    }
}
