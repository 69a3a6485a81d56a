pub mod api;

use anyhow::Result;
use axum::{
    Router,
    http::{Method, header},
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use api::AppState;

/// Build the API router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(Any)
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/cves", get(api::list_cves))
        .route("/stats", get(api::get_stats))
        .route("/sync", post(api::trigger_sync))
        .route("/sync/status", get(api::get_sync_status))
        .route("/healthz", get(api::healthz))
        .route("/readyz", get(api::readyz))
        .layer(cors)
        .with_state(state)
}

/// Bind and serve the API until the shutdown signal arrives.
pub async fn run(
    port: u16,
    state: AppState,
    mut shutdown: tokio::sync::watch::Receiver<bool>,
) -> Result<()> {
    let ready = state.ready.clone();
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(addr = %addr, "Server listening");
    ready.store(true, Ordering::SeqCst);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.changed().await;
            info!("Server shutting down");
        })
        .await?;

    Ok(())
}
