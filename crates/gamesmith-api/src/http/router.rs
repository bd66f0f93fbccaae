//! Axum router configuration with middleware.
//!
//! API routes are under `/api/v1/`; the preview page lives at `/preview`.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/session", get(handlers::session::get_session))
        .route("/messages", post(handlers::session::submit_message))
        .route("/regenerate", post(handlers::session::regenerate))
        .route("/restart", post(handlers::session::restart))
        .route("/artifact", get(handlers::artifact::get_artifact))
        .route(
            "/artifact/download",
            get(handlers::artifact::download_artifact),
        );

    Router::new()
        .route("/health", get(health_check))
        .route("/preview", get(handlers::preview::preview_page))
        .route("/preview/version", get(handlers::preview::preview_version))
        .nest("/api/v1", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
