//! scopewatch-api — the scrape endpoint.
//!
//! One route: `GET /metrics` renders the current snapshot in the
//! Prometheus text exposition format. A scrape only reads the snapshot
//! store; it never waits on, or fails because of, an in-flight
//! collection cycle.

pub mod render;

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use scopewatch_collector::SnapshotStore;
use tracing::debug;

pub use render::render_prometheus;

/// Shared state for the serving handlers.
#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<SnapshotStore>,
}

/// Build the serving router.
pub fn build_router(store: Arc<SnapshotStore>) -> Router {
    Router::new()
        .route("/metrics", get(metrics))
        .with_state(ApiState { store })
}

/// GET /metrics
async fn metrics(State(state): State<ApiState>) -> impl IntoResponse {
    let snapshot = state.store.read();
    debug!(cycle = snapshot.cycle, metrics = snapshot.len(), "serving scrape");

    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        render_prometheus(&snapshot),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use scopewatch_model::{Metric, ScoreKind};
    use tower::ServiceExt;

    async fn body_string(resp: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn metrics_endpoint_serves_empty_snapshot() {
        let store = SnapshotStore::shared();
        let router = build_router(store);

        let resp = router
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let content_type = resp.headers().get("content-type").unwrap().to_str().unwrap();
        assert!(content_type.contains("text/plain"));

        let body = body_string(resp).await;
        assert!(body.contains("# TYPE socket_score gauge"));
        assert!(!body.contains("socket_score{"));
    }

    #[tokio::test]
    async fn metrics_endpoint_serves_published_snapshot() {
        let store = SnapshotStore::shared();
        store.publish(vec![
            Metric::Score {
                package: "@celo/base".to_string(),
                version: "1.0.0".to_string(),
                score: ScoreKind::License,
                value: 0.5,
            },
            Metric::Download {
                package: "@celo/base".to_string(),
                date: "2024-01-01".to_string(),
                value: 42,
            },
        ]);
        let router = build_router(Arc::clone(&store));

        let resp = router
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_string(resp).await;
        assert!(body.contains(
            "socket_score{package=\"@celo/base\",version=\"1.0.0\",score=\"license\"} 0.5"
        ));
        assert!(body.contains("npm_download_count{package=\"@celo/base\",date=\"2024-01-01\"} 42"));
    }

    #[tokio::test]
    async fn unknown_routes_are_not_found() {
        let store = SnapshotStore::shared();
        let router = build_router(store);

        let resp = router
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
