//! Credential provisioning handlers.
//!
//! The caller owns key selection (the front-end shows a key modal); these
//! endpoints let it check, set and clear the process-wide selection. A
//! run that ends in a provider rejection clears the selection itself, so
//! a subsequent status check sends the caller back to the modal.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use reel_veo::ApiKey;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Credential status response.
#[derive(Debug, Serialize)]
pub struct CredentialStatusResponse {
    pub selected: bool,
}

/// Request body for selecting a credential.
#[derive(Debug, Deserialize, Validate)]
pub struct SelectCredentialRequest {
    #[validate(length(min = 1, message = "api_key must not be empty"))]
    pub api_key: String,
}

/// GET /api/credentials/status
///
/// Whether a provider credential is currently selected.
pub async fn get_credential_status(
    State(state): State<AppState>,
) -> Json<CredentialStatusResponse> {
    Json(CredentialStatusResponse {
        selected: state.credentials.is_selected().await,
    })
}

/// PUT /api/credentials
///
/// Select a provider credential, replacing any previous one.
///
/// Returns:
/// - 204: Credential selected
/// - 400: Empty key
pub async fn select_credential(
    State(state): State<AppState>,
    Json(request): Json<SelectCredentialRequest>,
) -> ApiResult<StatusCode> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let key = ApiKey::new(request.api_key);
    if key.is_empty() {
        return Err(ApiError::bad_request("api_key must not be empty"));
    }

    state.credentials.select(key).await;
    info!("Provider credential selected");

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/credentials
///
/// Clear the selected credential.
pub async fn clear_credential(State(state): State<AppState>) -> StatusCode {
    state.credentials.clear().await;
    info!("Provider credential cleared");
    StatusCode::NO_CONTENT
}
