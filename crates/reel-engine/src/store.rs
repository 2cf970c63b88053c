//! Artifact materialization.
//!
//! The orchestrator ends a run by turning downloaded bytes into a
//! playable resource. In this target that is a file on local disk; the
//! capability is a trait so other targets (or tests) can substitute an
//! in-memory or object-URL implementation.

use std::path::PathBuf;

use tracing::info;

use reel_models::JobId;

/// Capability to materialize downloaded bytes as a playable resource.
pub trait ArtifactStore: Send + Sync {
    /// Persist the artifact, returning a handle the caller can play or
    /// download (a filesystem path in this implementation).
    fn store(
        &self,
        job_id: &JobId,
        bytes: &[u8],
    ) -> impl std::future::Future<Output = std::io::Result<String>> + Send;
}

/// Stores artifacts as `{job_id}.mp4` under a work directory.
#[derive(Debug, Clone)]
pub struct DiskStore {
    work_dir: PathBuf,
}

impl DiskStore {
    /// Create a store rooted at the given directory.
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }

    /// Path an artifact for the given job would be written to.
    pub fn path_for(&self, job_id: &JobId) -> PathBuf {
        self.work_dir.join(format!("{}.mp4", job_id))
    }
}

impl ArtifactStore for DiskStore {
    async fn store(&self, job_id: &JobId, bytes: &[u8]) -> std::io::Result<String> {
        tokio::fs::create_dir_all(&self.work_dir).await?;

        let path = self.path_for(job_id);
        tokio::fs::write(&path, bytes).await?;

        info!(job_id = %job_id, size = bytes.len(), "Materialized output video");

        Ok(path.to_string_lossy().into_owned())
    }
}
