//! Generation handlers.
//!
//! Provides REST API endpoints for:
//! - Submitting a generation job
//! - Polling a job's status (fallback when the progress socket is closed)
//! - Listing the duration presets offered to the caller

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use validator::Validate;

use reel_engine::{DiskStore, Orchestrator, ProgressSender};
use reel_models::{DurationPreset, GenerationJob, JobId, WsMessage, LOADING_MESSAGES};
use reel_veo::ApiKey;

use crate::credentials::CredentialStore;
use crate::error::{ApiError, ApiResult};
use crate::registry::JobRegistry;
use crate::state::AppState;

// ============================================================================
// Types
// ============================================================================

/// Request body for submitting a generation job.
#[derive(Debug, Deserialize, Validate)]
pub struct GenerateRequest {
    /// Caption the video is generated from.
    #[validate(length(min = 1, max = 2000, message = "prompt must be 1-2000 characters"))]
    pub prompt: String,

    /// Duration preset; resolved to a segment count.
    #[serde(default)]
    pub preset: Option<DurationPreset>,

    /// Explicit segment count; takes precedence over the preset.
    #[serde(default)]
    pub segments: Option<u32>,
}

impl GenerateRequest {
    /// Resolve the requested segment count, defaulting to one segment.
    fn segment_count(&self) -> ApiResult<u32> {
        let count = self
            .segments
            .or_else(|| self.preset.map(|p| p.segment_count()))
            .unwrap_or(1);

        if !(1..=4).contains(&count) {
            return Err(ApiError::bad_request("segments must be between 1 and 4"));
        }

        Ok(count)
    }
}

/// Response for a submitted generation job.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub job_id: JobId,
}

/// Job status response.
#[derive(Debug, Serialize)]
pub struct JobStatusResponse {
    /// Job ID
    pub job_id: String,
    /// Caption the job was submitted with
    pub prompt: String,
    /// Current status: pending, processing, completed, failed
    pub status: String,
    /// Progress percentage (0-100)
    pub progress: u8,
    /// Total segments in the chain
    pub segment_count: u32,
    /// Segment currently being generated (1-based)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_segment: Option<u32>,
    /// Error message if the job failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Path of the playable output if the job completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
    /// When the job was created
    pub created_at: String,
    /// When the status was last updated
    pub updated_at: String,
    /// When processing started
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    /// When processing finished
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

impl From<GenerationJob> for JobStatusResponse {
    fn from(job: GenerationJob) -> Self {
        Self {
            job_id: job.id.to_string(),
            prompt: job.prompt,
            status: job.state.as_str().to_string(),
            progress: job.progress,
            segment_count: job.segment_count,
            current_segment: job.current_segment,
            error_message: job.error_message,
            output_path: job.output_path,
            created_at: job.created_at.to_rfc3339(),
            updated_at: job.updated_at.to_rfc3339(),
            started_at: job.started_at.map(|t| t.to_rfc3339()),
            completed_at: job.completed_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// One duration preset entry.
#[derive(Debug, Serialize)]
pub struct PresetEntry {
    pub preset: DurationPreset,
    pub label: &'static str,
    pub segments: u32,
    pub approx_seconds: u32,
}

/// Preset table plus the cosmetic loading lines the caller rotates
/// through while a job runs.
#[derive(Debug, Serialize)]
pub struct PresetsResponse {
    pub presets: Vec<PresetEntry>,
    pub loading_messages: Vec<&'static str>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/generate
///
/// Submit a generation job. Requires a selected credential; the run is
/// spawned in the background and progress is observed via the status
/// endpoint or the job's WebSocket.
///
/// Returns:
/// - 202: Job accepted, body carries the job ID
/// - 400: Invalid prompt or segment count
/// - 401: No credential selected
pub async fn start_generation(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> ApiResult<(StatusCode, Json<GenerateResponse>)> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let segment_count = request.segment_count()?;

    let Some(key) = state.credentials.current().await else {
        return Err(ApiError::CredentialMissing);
    };

    let job = GenerationJob::new(request.prompt.clone(), segment_count);
    let job_id = job.id.clone();

    info!(job_id = %job_id, segment_count, "Accepted generation job");

    state.jobs.insert(job).await;

    let engine = Arc::clone(&state.engine);
    let jobs = Arc::clone(&state.jobs);
    let credentials = Arc::clone(&state.credentials);
    let prompt = request.prompt;
    let spawned_id = job_id.clone();

    tokio::spawn(async move {
        run_generation(
            engine,
            jobs,
            credentials,
            key,
            spawned_id,
            prompt,
            segment_count,
        )
        .await;
    });

    Ok((StatusCode::ACCEPTED, Json(GenerateResponse { job_id })))
}

/// Drive one generation run to completion and settle its job record.
async fn run_generation(
    engine: Arc<Orchestrator<DiskStore>>,
    jobs: Arc<JobRegistry>,
    credentials: Arc<CredentialStore>,
    key: ApiKey,
    job_id: JobId,
    prompt: String,
    segment_count: u32,
) {
    jobs.update(&job_id, GenerationJob::start).await;

    let (progress, mut rx) = ProgressSender::channel();

    // Forward engine progress into the registry (record + subscribers).
    let forward_jobs = Arc::clone(&jobs);
    let forward_id = job_id.clone();
    let forwarder = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            forward_jobs.publish(&forward_id, message).await;
        }
    });

    let result = engine
        .generate(&key, &job_id, &prompt, segment_count, &progress)
        .await;

    // Close the channel so the forwarder drains and exits before the
    // terminal event is published.
    drop(progress);
    let _ = forwarder.await;

    match result {
        Ok(path) => {
            info!(job_id = %job_id, path = %path, "Generation job completed");
            jobs.publish(&job_id, WsMessage::done(path)).await;
        }
        Err(err) => {
            if err.is_credential_rejected() {
                warn!(job_id = %job_id, "Provider rejected the API key, clearing selection");
                credentials.clear().await;
            }
            error!(job_id = %job_id, error = %err, "Generation job failed");
            jobs.publish(&job_id, WsMessage::error(err.to_string())).await;
        }
    }
}

/// GET /api/jobs/:job_id/status
///
/// Get the current status of a generation job. Used as a polling fallback
/// when the WebSocket connection is unavailable or after a page refresh.
///
/// Returns:
/// - 200: Job status snapshot
/// - 400: Malformed job ID
/// - 404: Job not found
pub async fn get_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<JobStatusResponse>> {
    if !is_valid_job_id(&job_id) {
        return Err(ApiError::bad_request("Invalid job ID format"));
    }

    let job = state
        .jobs
        .get(&JobId::from_string(job_id))
        .await
        .ok_or_else(|| ApiError::not_found("Job not found"))?;

    Ok(Json(job.into()))
}

/// GET /api/presets
///
/// List the duration presets and the loading lines the caller can rotate
/// through while a job runs.
pub async fn list_presets() -> Json<PresetsResponse> {
    let presets = DurationPreset::all()
        .iter()
        .map(|preset| PresetEntry {
            preset: *preset,
            label: preset.label(),
            segments: preset.segment_count(),
            approx_seconds: preset.approx_seconds(),
        })
        .collect();

    Json(PresetsResponse {
        presets,
        loading_messages: LOADING_MESSAGES.to_vec(),
    })
}

// ============================================================================
// Helpers
// ============================================================================

/// Validate job ID format to prevent injection attacks.
///
/// Valid format: alphanumeric characters and hyphens only, 8-64 chars.
fn is_valid_job_id(id: &str) -> bool {
    if id.len() < 8 || id.len() > 64 {
        return false;
    }
    id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}
