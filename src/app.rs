//! Route tables for the three services. Each builder returns a ready
//! `Router` that tests can drive with `oneshot` without binding a port.

use std::net::SocketAddr;

use axum::{
    extract::DefaultBodyLimit,
    routing::{any, delete, get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::{
    routes::{self, fallback},
    AppState,
};

const BODY_LIMIT_BYTES: usize = 50 * 1024 * 1024;

pub fn webhook_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/", get(routes::telegram::index))
        .route("/health", get(routes::health::health))
        .route("/webhook", post(routes::telegram::handle_webhook))
        .route("/set-webhook", post(routes::telegram::set_webhook))
        .route("/webhook-info", get(routes::telegram::webhook_info));

    with_shared_layers(router, state)
}

pub fn proxy_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/", get(routes::proxy::index))
        .route("/health", get(routes::health::health))
        .route("/api/telegram/*path", any(routes::proxy::forward_telegram))
        .route("/api/story/send", post(routes::proxy::send_story))
        .route("/api/story/list", get(routes::proxy::list_stories))
        .route("/api/story/:id", delete(routes::proxy::delete_story));

    with_shared_layers(router, state)
}

pub fn story_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/", get(routes::story::index))
        .route("/health", get(routes::health::health))
        .route("/api/story/upload", post(routes::story::upload_story))
        .route("/api/story/view", post(routes::story::view_story))
        .route("/api/story/react", post(routes::story::react_to_story))
        .route("/api/story/list", get(routes::story::list_stories))
        .route(
            "/api/story/:id",
            get(routes::story::get_story).delete(routes::story::delete_story),
        )
        .route("/api/story/:id/viewers", get(routes::story::get_story_viewers));

    with_shared_layers(router, state)
}

/// 404 for unknown paths and unsupported methods, panic-to-500 conversion, CORS, tracing and body limit.
pub fn with_shared_layers(router: Router<AppState>, state: AppState) -> Router {
    router
        .fallback(fallback::not_found)
        .method_not_allowed_fallback(fallback::not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(fallback::handle_panic))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
}

pub async fn serve(app: Router, port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
