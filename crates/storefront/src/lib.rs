//! Candy Shop Storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused. The binary in `main.rs` adds
//! configuration loading, Sentry and the listener.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, middleware::from_fn, routing::get};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the storefront router: pages, health checks, static assets and
/// the request middleware.
pub fn app(state: AppState) -> Router {
    let static_dir = state.config().static_dir.clone();

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .nest_service("/css", ServeDir::new(static_dir.join("css")))
        .nest_service("/images", ServeDir::new(static_dir.join("images")))
        .layer(from_fn(middleware::security_headers_middleware))
        .layer(from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .with_state(state)
}

/// Span for one HTTP request, with a slot for the request ID.
fn make_request_span(request: &axum::extract::Request) -> tracing::Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = tracing::field::Empty,
    )
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the order store is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.orders().health_check().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    use super::*;
    use crate::config::StorefrontConfig;
    use crate::db::InMemoryOrderStore;
    use crate::db::testing::FailingOrderStore;

    async fn status_of(app: Router, path: &str) -> StatusCode {
        app.oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_health_and_readiness() {
        let app = app(AppState::new(
            StorefrontConfig::default(),
            Arc::new(InMemoryOrderStore::new()),
        ));

        assert_eq!(status_of(app.clone(), "/health").await, StatusCode::OK);
        assert_eq!(status_of(app, "/health/ready").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_readiness_fails_when_store_is_down() {
        let app = app(AppState::new(
            StorefrontConfig::default(),
            Arc::new(FailingOrderStore),
        ));

        assert_eq!(
            status_of(app, "/health/ready").await,
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[tokio::test]
    async fn test_home_page_renders() {
        let app = app(AppState::new(
            StorefrontConfig::default(),
            Arc::new(InMemoryOrderStore::new()),
        ));

        assert_eq!(status_of(app, "/").await, StatusCode::OK);
    }
}
