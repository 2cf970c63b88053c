//! Engine error types.

use thiserror::Error;

use reel_veo::VeoError;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("No API key is configured")]
    CredentialMissing,

    #[error("Provider rejected the API key")]
    CredentialRejected,

    #[error("Segment {segment} generation failed: {reason}")]
    SegmentFailed { segment: u32, reason: String },

    #[error("Final segment produced no downloadable artifact")]
    MissingFinalArtifact,

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Failed to materialize artifact: {0}")]
    Store(#[from] std::io::Error),
}

impl EngineError {
    pub fn segment_failed(segment: u32, reason: impl Into<String>) -> Self {
        Self::SegmentFailed {
            segment,
            reason: reason.into(),
        }
    }

    /// Classify a client error raised while submitting or polling a
    /// segment job. Credential-rejection signals abort the run as such on
    /// any segment; everything else is pinned to the failing segment.
    pub fn from_veo(segment: u32, err: VeoError) -> Self {
        if err.is_credential_rejected() {
            EngineError::CredentialRejected
        } else {
            EngineError::segment_failed(segment, err.to_string())
        }
    }

    /// Classify a client error raised during the final download.
    pub fn from_download(err: VeoError) -> Self {
        match err {
            VeoError::CredentialRejected => EngineError::CredentialRejected,
            VeoError::DownloadFailed(reason) => EngineError::DownloadFailed(reason),
            other => EngineError::DownloadFailed(other.to_string()),
        }
    }

    /// True if the run ended because the credential must be re-selected.
    pub fn is_credential_rejected(&self) -> bool {
        matches!(self, EngineError::CredentialRejected)
    }
}
