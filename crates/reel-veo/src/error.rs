//! Veo client error types.

use thiserror::Error;

pub type VeoResult<T> = Result<T, VeoError>;

/// Marker the provider embeds in error bodies when the API key has been
/// invalidated or rotated. A 404 on the download endpoint signals the
/// same condition.
pub const CREDENTIAL_REJECTED_MARKER: &str = "Requested entity was not found";

#[derive(Debug, Error)]
pub enum VeoError {
    #[error("Provider rejected the API key")]
    CredentialRejected,

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VeoError {
    /// Classify a provider error body, promoting the key-rotation marker
    /// to `CredentialRejected`.
    pub fn from_provider_body(status: reqwest::StatusCode, body: &str) -> Self {
        if body.contains(CREDENTIAL_REJECTED_MARKER) {
            VeoError::CredentialRejected
        } else {
            VeoError::RequestFailed(format!("provider returned {}: {}", status, body))
        }
    }

    /// True if the provider signalled an invalidated/rotated credential.
    pub fn is_credential_rejected(&self) -> bool {
        matches!(self, VeoError::CredentialRejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_marker_promotes_to_credential_rejected() {
        let err = VeoError::from_provider_body(
            StatusCode::NOT_FOUND,
            "{\"error\":{\"message\":\"Requested entity was not found.\"}}",
        );
        assert!(err.is_credential_rejected());
    }

    #[test]
    fn test_other_bodies_stay_request_failed() {
        let err = VeoError::from_provider_body(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert!(!err.is_credential_rejected());
        assert!(matches!(err, VeoError::RequestFailed(_)));
    }
}
