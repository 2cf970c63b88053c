//! In-memory job registry.
//!
//! Holds each generation attempt's record and fans its progress events
//! out to WebSocket subscribers. Records are process-local and die with
//! the process; a new attempt always registers a fresh record.

use std::collections::HashMap;

use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use reel_models::{GenerationJob, JobId, WsMessage};

/// Buffered events per job; slow subscribers that fall further behind
/// see a lagged error and skip ahead.
const EVENT_BUFFER: usize = 64;

struct JobEntry {
    job: GenerationJob,
    events: broadcast::Sender<WsMessage>,
}

/// Registry of in-flight and settled generation jobs.
#[derive(Default)]
pub struct JobRegistry {
    jobs: RwLock<HashMap<JobId, JobEntry>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new job record.
    pub async fn insert(&self, job: GenerationJob) {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        let id = job.id.clone();
        self.jobs.write().await.insert(id, JobEntry { job, events });
    }

    /// Snapshot a job record.
    pub async fn get(&self, id: &JobId) -> Option<GenerationJob> {
        self.jobs.read().await.get(id).map(|entry| entry.job.clone())
    }

    /// Apply a transition to a job record.
    pub async fn update(&self, id: &JobId, f: impl FnOnce(GenerationJob) -> GenerationJob) {
        let mut jobs = self.jobs.write().await;
        if let Some(entry) = jobs.get_mut(id) {
            entry.job = f(entry.job.clone());
        }
    }

    /// Subscribe to a job's progress events.
    pub async fn subscribe(&self, id: &JobId) -> Option<broadcast::Receiver<WsMessage>> {
        self.jobs
            .read()
            .await
            .get(id)
            .map(|entry| entry.events.subscribe())
    }

    /// Publish a progress event: fold it into the job record, then fan it
    /// out to subscribers.
    pub async fn publish(&self, id: &JobId, message: WsMessage) {
        let mut jobs = self.jobs.write().await;
        let Some(entry) = jobs.get_mut(id) else {
            debug!(job_id = %id, "Dropping event for unknown job");
            return;
        };

        let job = entry.job.clone();
        entry.job = match &message {
            WsMessage::Progress { value } => job.with_progress(*value),
            WsMessage::SegmentStarted { segment, .. } => job.with_segment(*segment),
            WsMessage::Done { output } => job.complete(output.clone()),
            WsMessage::Error { message, .. } => job.fail(message.clone()),
            WsMessage::Log { .. } => job,
        };

        // No receivers is fine; the status endpoint still sees the record.
        let _ = entry.events.send(message);
    }
}
