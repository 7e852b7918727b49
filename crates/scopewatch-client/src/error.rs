//! Error types for upstream calls.

use thiserror::Error;

/// Result type alias for upstream client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors surfaced by the upstream clients after the retry policy has
/// been exhausted.
///
/// The caller treats any of these as a single package-level failure;
/// only the package-listing call escalates one to a cycle failure.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The HTTP client itself could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// Connect failure, timeout, or other transport-level error.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The upstream answered, but not with a 2xx.
    ///
    /// Auth rejections (401/403) are not special-cased; they land here
    /// like any other terminal status.
    #[error("unexpected status {status} from {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// The response body was not the JSON shape we expect.
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}
