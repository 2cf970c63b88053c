//! Generation job definitions.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a generation job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Generation job state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Job accepted but not yet running
    #[default]
    Pending,
    /// Segments are being generated
    Processing,
    /// Final video is ready
    Completed,
    /// Generation aborted with an error
    Failed,
}

impl JobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Pending => "pending",
            JobState::Processing => "processing",
            JobState::Completed => "completed",
            JobState::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }
}

/// A multi-segment video generation job.
///
/// One record per generation attempt; a new attempt always gets a fresh
/// record. Records live only in memory.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GenerationJob {
    /// Unique job ID
    pub id: JobId,

    /// Caption the video is generated from
    pub prompt: String,

    /// Number of chained segments to generate
    pub segment_count: u32,

    /// Job state
    #[serde(default)]
    pub state: JobState,

    /// Progress (0-100)
    #[serde(default)]
    pub progress: u8,

    /// Segment currently being generated (1-based)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_segment: Option<u32>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,

    /// Started at timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    /// Completed at timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    /// Error message (if failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// Path of the materialized output video (if completed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
}

impl GenerationJob {
    /// Create a new pending job.
    pub fn new(prompt: impl Into<String>, segment_count: u32) -> Self {
        let now = Utc::now();

        Self {
            id: JobId::new(),
            prompt: prompt.into(),
            segment_count,
            state: JobState::Pending,
            progress: 0,
            current_segment: None,
            created_at: now,
            updated_at: now,
            started_at: None,
            completed_at: None,
            error_message: None,
            output_path: None,
        }
    }

    /// Start processing the job.
    pub fn start(mut self) -> Self {
        self.state = JobState::Processing;
        self.started_at = Some(Utc::now());
        self.updated_at = Utc::now();
        self
    }

    /// Mark job as completed with the materialized output.
    pub fn complete(mut self, output_path: impl Into<String>) -> Self {
        self.state = JobState::Completed;
        self.output_path = Some(output_path.into());
        self.completed_at = Some(Utc::now());
        self.updated_at = Utc::now();
        self.progress = 100;
        self.current_segment = None;
        self
    }

    /// Mark job as failed.
    pub fn fail(mut self, error: impl Into<String>) -> Self {
        self.state = JobState::Failed;
        self.error_message = Some(error.into());
        self.updated_at = Utc::now();
        self
    }

    /// Record the segment currently in flight.
    pub fn with_segment(mut self, segment: u32) -> Self {
        self.current_segment = Some(segment);
        self.updated_at = Utc::now();
        self
    }

    /// Update progress.
    pub fn with_progress(mut self, progress: u8) -> Self {
        self.progress = progress.min(100);
        self.updated_at = Utc::now();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_creation() {
        let job = GenerationJob::new("a cat in space", 3);

        assert_eq!(job.segment_count, 3);
        assert_eq!(job.state, JobState::Pending);
        assert_eq!(job.progress, 0);
        assert!(job.output_path.is_none());
    }

    #[test]
    fn test_job_state_transitions() {
        let job = GenerationJob::new("a cat in space", 1);

        let started = job.start();
        assert_eq!(started.state, JobState::Processing);
        assert!(started.started_at.is_some());

        let completed = started.complete("/tmp/reel/abc.mp4");
        assert_eq!(completed.state, JobState::Completed);
        assert_eq!(completed.progress, 100);
        assert_eq!(completed.output_path.as_deref(), Some("/tmp/reel/abc.mp4"));
    }

    #[test]
    fn test_job_failure() {
        let job = GenerationJob::new("a cat in space", 2).start();

        let failed = job.fail("segment 2 produced no video");
        assert_eq!(failed.state, JobState::Failed);
        assert!(failed.state.is_terminal());
        assert!(failed.error_message.is_some());
        assert!(failed.output_path.is_none());
    }

    #[test]
    fn test_progress_clamped() {
        let job = GenerationJob::new("a cat in space", 1).with_progress(150);
        assert_eq!(job.progress, 100);
    }
}
