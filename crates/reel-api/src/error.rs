//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No API key selected")]
    CredentialMissing,

    #[error("Provider rejected the API key")]
    CredentialRejected,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::CredentialMissing | ApiError::CredentialRejected => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code; the front-end keys its credential
    /// re-selection flow off these.
    fn code(&self) -> Option<&'static str> {
        match self {
            ApiError::CredentialMissing => Some("credential_missing"),
            ApiError::CredentialRejected => Some("credential_rejected"),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'static str>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Don't expose internal error details in production
        let detail = match &self {
            ApiError::Internal(_) => {
                if std::env::var("ENVIRONMENT").unwrap_or_default() == "production" {
                    "An internal error occurred".to_string()
                } else {
                    self.to_string()
                }
            }
            _ => self.to_string(),
        };

        let body = ErrorResponse {
            detail,
            code: self.code(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_errors_are_unauthorized() {
        assert_eq!(ApiError::CredentialMissing.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::CredentialRejected.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_credential_errors_carry_codes() {
        assert_eq!(ApiError::CredentialMissing.code(), Some("credential_missing"));
        assert_eq!(ApiError::CredentialRejected.code(), Some("credential_rejected"));
        assert_eq!(ApiError::bad_request("x").code(), None);
    }
}
