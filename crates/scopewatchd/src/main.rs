//! scopewatchd — the exporter daemon.
//!
//! Assembles the pipeline:
//! - upstream clients over one retrying transport
//! - collector + scheduler (background refresh)
//! - snapshot store (shared with the serving path)
//! - axum `/metrics` endpoint
//!
//! Startup runs one collection cycle synchronously before the serving
//! port opens; if that cycle fails the process exits non-zero, since
//! there is no meaningful snapshot to serve.
//!
//! # Usage
//!
//! ```text
//! API_TOKEN=... PERIOD=24 scopewatchd
//! ```

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use clap::Parser;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

use scopewatch_client::{RegistryClient, RetryPolicy, SocketClient, Transport};
use scopewatch_collector::{Collector, Scheduler, SnapshotStore};

/// Configuration, sourced from the environment (flags override).
#[derive(Parser, Debug)]
#[command(name = "scopewatchd", about = "npm scope score and download exporter")]
struct Config {
    /// socket.dev API token.
    #[arg(long, env = "API_TOKEN", hide_env_values = true)]
    api_token: String,

    /// Hours between collection cycles.
    #[arg(long, env = "PERIOD", default_value_t = 24)]
    period: u64,

    /// Retry attempts per upstream request after the first failure.
    #[arg(long, env = "RETRIES", default_value_t = 5)]
    retries: u32,

    /// Per-request timeout in seconds.
    #[arg(long, env = "TIMEOUT", default_value_t = 15)]
    timeout: u64,

    /// Maximum packages per cycle; negative means unlimited.
    #[arg(long, env = "MAX_PACKAGES", default_value_t = -1, allow_negative_numbers = true)]
    max_packages: i64,

    /// Default log filter when RUST_LOG is unset.
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// npm scope whose packages are watched.
    #[arg(long, env = "SCOPE", default_value = "celo")]
    scope: String,

    /// Port for the /metrics endpoint.
    #[arg(long, env = "PORT", default_value_t = 9101)]
    port: u16,

    /// Whether to fetch per-package download counts.
    #[arg(long, env = "DOWNLOADS", default_value_t = true, action = clap::ArgAction::Set)]
    downloads: bool,
}

/// Map the env-style package limit onto the collector's option.
fn max_packages_limit(raw: i64) -> Option<usize> {
    usize::try_from(raw).ok()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    info!(scope = %config.scope, period_hours = config.period, "scopewatchd starting");

    // ── Assemble the pipeline ──────────────────────────────────

    let transport = Transport::new(RetryPolicy {
        retries: config.retries,
        timeout: Duration::from_secs(config.timeout),
    })?;
    let registry = RegistryClient::new(transport.clone());
    let socket = SocketClient::new(transport, &config.api_token);

    let collector = Collector::new(registry, socket, config.scope.clone())
        .with_max_packages(max_packages_limit(config.max_packages))
        .with_downloads(config.downloads);

    let store = SnapshotStore::shared();
    let scheduler = Scheduler::new(
        collector,
        Arc::clone(&store),
        Duration::from_secs(config.period * 3600),
    );

    // ── First cycle (blocks readiness) ─────────────────────────

    info!("running initial collection cycle before serving");
    scheduler
        .bootstrap()
        .await
        .context("initial collection cycle failed")?;

    // ── Background refresh ─────────────────────────────────────

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler_handle = tokio::spawn(async move {
        scheduler.run(shutdown_rx).await;
    });

    // ── Serving ────────────────────────────────────────────────

    let router = scopewatch_api::build_router(store);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "metrics endpoint listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to install CTRL+C handler");
            info!("shutdown signal received");
            let _ = shutdown_tx.send(true);
        })
        .await?;

    let _ = scheduler_handle.await;
    info!("scopewatchd stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = Config::try_parse_from(["scopewatchd", "--api-token", "tok"]).unwrap();
        assert_eq!(config.period, 24);
        assert_eq!(config.retries, 5);
        assert_eq!(config.timeout, 15);
        assert_eq!(config.max_packages, -1);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.scope, "celo");
        assert_eq!(config.port, 9101);
        assert!(config.downloads);
    }

    #[test]
    fn missing_token_is_a_parse_error() {
        // Only meaningful when API_TOKEN is not set in the test env.
        if std::env::var_os("API_TOKEN").is_none() {
            assert!(Config::try_parse_from(["scopewatchd"]).is_err());
        }
    }

    #[test]
    fn downloads_flag_accepts_explicit_value() {
        let config =
            Config::try_parse_from(["scopewatchd", "--api-token", "tok", "--downloads", "false"])
                .unwrap();
        assert!(!config.downloads);
    }

    #[test]
    fn negative_max_packages_means_unlimited() {
        assert_eq!(max_packages_limit(-1), None);
        assert_eq!(max_packages_limit(0), Some(0));
        assert_eq!(max_packages_limit(2), Some(2));
    }
}
