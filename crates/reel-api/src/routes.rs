//! API routes.

use axum::middleware;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::credentials::{clear_credential, get_credential_status, select_credential};
use crate::handlers::generate::{get_job_status, list_presets, start_generation};
use crate::handlers::health;
use crate::middleware::{cors_layer, request_id, request_logging, security_headers};
use crate::state::AppState;
use crate::ws::ws_job_progress;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Submit a generation job
        .route("/generate", post(start_generation))
        // Poll job status
        .route("/jobs/:job_id/status", get(get_job_status))
        // Duration presets
        .route("/presets", get(list_presets))
        // Credential provisioning
        .route("/credentials/status", get(get_credential_status))
        .route(
            "/credentials",
            put(select_credential).delete(clear_credential),
        );

    let ws_routes = Router::new().route("/ws/jobs/:job_id", get(ws_job_progress));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health));

    Router::new()
        .nest("/api", api_routes)
        .merge(ws_routes)
        .merge(health_routes)
        // Request body size limit to prevent oversized payloads
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
