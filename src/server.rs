use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::{
    config::Config,
    handlers::{self, process::AppState},
    static_files,
};

/// Start the repricing server
///
/// This function:
/// 1. Initializes tracing/logging
/// 2. Creates the Axum application
/// 3. Binds to the configured address
/// 4. Serves requests with graceful shutdown on ctrl-c
pub async fn start_server(config: Config) -> Result<()> {
    crate::init_tracing(&config.server.log_level);
    info!("TCG repricer starting...");

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    info!(
        max_upload_mb = config.limits.max_upload_bytes / 1024 / 1024,
        default_multiplier = config.pricing.default_multiplier,
        "Starting TCG repricer on {}",
        addr
    );

    let app = create_router(config);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received, draining connections...");
        })
        .await?;

    info!("Server stopped gracefully");
    Ok(())
}

/// Create the Axum router with all routes and middleware
pub fn create_router(config: Config) -> Router {
    // The request body carries both snapshots plus multipart framing, so the
    // transport limit is twice the per-file limit with headroom on top,
    // saturating rather than overflowing for an absurd configured limit.
    let body_limit = config
        .limits
        .max_upload_bytes
        .saturating_mul(2)
        .saturating_add(64 * 1024);

    let state = AppState {
        config: Arc::new(config),
    };

    let api_routes = Router::new()
        .route("/api/process", post(handlers::process::process_snapshots))
        .route("/api/summary", post(handlers::summary::summarize_rows))
        .layer(CorsLayer::permissive())
        .with_state(state);

    Router::new()
        .route("/", get(static_files::serve_index))
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .merge(api_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_router_serves_health() {
        let app = create_router(Config::default());
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_router_serves_index() {
        let app = create_router(Config::default());
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_router_tolerates_huge_upload_limit() {
        let mut config = Config::default();
        config.limits.max_upload_bytes = usize::MAX;

        let app = create_router(config);
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let app = create_router(Config::default());
        let response = app
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
