//! Engine configuration.

use std::time::Duration;

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Fixed interval between operation status polls.
    ///
    /// The poll loop has no attempt cap and no backoff; a job that never
    /// reports done keeps the run suspended at the poll step. Keeping the
    /// interval configurable lets tests run the loop fast.
    pub poll_interval: Duration,
    /// Directory the materialized output videos are written to
    pub work_dir: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
            work_dir: "/tmp/reelforge".to_string(),
        }
    }
}

impl EngineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            poll_interval: Duration::from_secs(
                std::env::var("VEO_POLL_INTERVAL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            ),
            work_dir: std::env::var("ENGINE_WORK_DIR")
                .unwrap_or_else(|_| "/tmp/reelforge".to_string()),
        }
    }
}
