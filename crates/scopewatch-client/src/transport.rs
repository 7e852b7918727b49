//! Shared retrying transport.
//!
//! Every outbound call goes through [`Transport::get_json`], which
//! applies the configured per-request timeout and a bounded retry
//! count to transport failures and retryable status classes. Backoff
//! between attempts doubles from a small base and is capped well under
//! the timeout budget.

use std::time::Duration;

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};

/// Backoff before the first retry.
const INITIAL_BACKOFF: Duration = Duration::from_millis(500);

/// Backoff ceiling between attempts.
const MAX_BACKOFF: Duration = Duration::from_secs(5);

/// Retry and timeout configuration for all upstream calls.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Additional attempts after the first failure.
    pub retries: u32,
    /// Per-request timeout; the only cancellation primitive.
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 5,
            timeout: Duration::from_secs(15),
        }
    }
}

/// One `reqwest::Client` shared by both upstream clients.
#[derive(Debug, Clone)]
pub struct Transport {
    client: reqwest::Client,
    retries: u32,
}

impl Transport {
    /// Build the shared HTTP client from a retry policy.
    pub fn new(policy: RetryPolicy) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("scopewatch/", env!("CARGO_PKG_VERSION")))
            .timeout(policy.timeout)
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self {
            client,
            retries: policy.retries,
        })
    }

    /// GET `url` and decode the JSON body, retrying per the policy.
    ///
    /// `prepare` is applied to each attempt's request builder, so
    /// callers can attach headers without the transport knowing about
    /// them.
    pub async fn get_json<T, F>(&self, url: &str, prepare: F) -> ClientResult<T>
    where
        T: DeserializeOwned,
        F: Fn(RequestBuilder) -> RequestBuilder,
    {
        let mut attempt: u32 = 0;
        let mut backoff = INITIAL_BACKOFF;

        loop {
            attempt += 1;
            debug!(url, attempt, "sending upstream request");

            match prepare(self.client.get(url)).send().await {
                Ok(resp) if resp.status().is_success() => {
                    return resp.json::<T>().await.map_err(|e| ClientError::Decode {
                        url: url.to_string(),
                        source: e,
                    });
                }
                Ok(resp) => {
                    let status = resp.status();
                    if !retryable_status(status) || attempt > self.retries {
                        warn!(url, %status, attempt, "upstream request failed");
                        return Err(ClientError::Status {
                            url: url.to_string(),
                            status,
                        });
                    }
                    debug!(url, %status, attempt, "retryable upstream status");
                }
                Err(e) => {
                    if attempt > self.retries {
                        warn!(url, error = %e, attempt, "upstream request failed after retries");
                        return Err(ClientError::Transport {
                            url: url.to_string(),
                            source: e,
                        });
                    }
                    debug!(url, error = %e, attempt, "retryable transport error");
                }
            }

            tokio::time::sleep(backoff).await;
            backoff = (backoff * 2).min(MAX_BACKOFF);
        }
    }
}

/// Whether a non-2xx status is worth another attempt.
fn retryable_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_and_throttling_are_retryable() {
        assert!(retryable_status(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(retryable_status(StatusCode::BAD_GATEWAY));
        assert!(retryable_status(StatusCode::SERVICE_UNAVAILABLE));
        assert!(retryable_status(StatusCode::TOO_MANY_REQUESTS));
    }

    #[test]
    fn client_errors_are_terminal() {
        assert!(!retryable_status(StatusCode::BAD_REQUEST));
        assert!(!retryable_status(StatusCode::UNAUTHORIZED));
        assert!(!retryable_status(StatusCode::FORBIDDEN));
        assert!(!retryable_status(StatusCode::NOT_FOUND));
    }

    #[test]
    fn default_policy_matches_documented_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.retries, 5);
        assert_eq!(policy.timeout, Duration::from_secs(15));
    }

    #[test]
    fn backoff_stays_under_timeout_budget() {
        let mut backoff = INITIAL_BACKOFF;
        for _ in 0..10 {
            backoff = (backoff * 2).min(MAX_BACKOFF);
        }
        assert!(backoff <= MAX_BACKOFF);
        assert!(MAX_BACKOFF < RetryPolicy::default().timeout);
    }
}
