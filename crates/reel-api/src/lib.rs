//! Axum HTTP API server.
//!
//! This crate provides:
//! - Generation submission and job status polling
//! - Per-job progress streaming over WebSocket
//! - Credential provisioning endpoints
//! - CORS, security headers and request logging

pub mod config;
pub mod credentials;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod registry;
pub mod routes;
pub mod state;
pub mod ws;

pub use config::ApiConfig;
pub use credentials::CredentialStore;
pub use error::{ApiError, ApiResult};
pub use registry::JobRegistry;
pub use routes::create_router;
pub use state::AppState;
