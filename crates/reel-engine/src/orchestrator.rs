//! The video generation orchestrator.

use tracing::{info, warn};

use reel_models::JobId;
use reel_veo::{ApiKey, GenerateVideosRequest, VeoClient, VeoModel, VideoReference};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::progress::ProgressSender;
use crate::store::ArtifactStore;

/// Fixed instruction used for every segment after the first.
const EXTENSION_PROMPT: &str =
    "Make the video longer, continuing the story in a seamless way.";

/// Chains generation jobs into a single downloadable video.
///
/// Holds no per-run state: every invocation of [`generate`] is
/// independent, and exactly one operation handle is in flight at any
/// point within a run.
///
/// [`generate`]: Orchestrator::generate
pub struct Orchestrator<S> {
    veo: VeoClient,
    store: S,
    config: EngineConfig,
}

impl<S: ArtifactStore> Orchestrator<S> {
    /// Create a new orchestrator.
    pub fn new(veo: VeoClient, store: S, config: EngineConfig) -> Self {
        Self { veo, store, config }
    }

    /// Generate a video of `segment_count` chained segments from `prompt`
    /// and return the path of the materialized output.
    ///
    /// Segment 1 is generated from the caller's prompt on the fast model
    /// variant; segments 2..N extend the previous segment's video with a
    /// fixed continuation instruction on the standard variant. Each
    /// operation is polled at the configured fixed interval until done.
    /// Any failure aborts the whole chain; nothing is retried and no
    /// partial artifact is exposed.
    pub async fn generate(
        &self,
        key: &ApiKey,
        job_id: &JobId,
        prompt: &str,
        segment_count: u32,
        progress: &ProgressSender,
    ) -> EngineResult<String> {
        if key.is_empty() {
            return Err(EngineError::CredentialMissing);
        }

        // Contract: at least one segment.
        let total = segment_count.max(1);
        let mut prior: Option<VideoReference> = None;

        for segment in 1..=total {
            let request_prompt = if segment == 1 { prompt } else { EXTENSION_PROMPT };
            let model = VeoModel::for_segment(segment);
            let request = GenerateVideosRequest::new(request_prompt, prior.take());

            progress.segment_started(segment, total);
            progress.log(format!("Generating segment {} of {}...", segment, total));
            info!(job_id = %job_id, segment, total, model = model.as_str(), "Submitting segment");

            let mut operation = self
                .veo
                .generate_videos(key, model, &request)
                .await
                .map_err(|e| EngineError::from_veo(segment, e))?;

            progress.log(format!(
                "Processing segment {}... This can take a few minutes.",
                segment
            ));

            while !operation.done {
                tokio::time::sleep(self.config.poll_interval).await;
                operation = self
                    .veo
                    .get_operation(key, &operation)
                    .await
                    .map_err(|e| EngineError::from_veo(segment, e))?;
            }

            let video = operation.first_video().cloned().ok_or_else(|| {
                warn!(job_id = %job_id, segment, "Operation finished without a generated video");
                EngineError::segment_failed(segment, "job completed without a generated video")
            })?;

            // Segments account for the first 90%; the download takes the rest.
            progress.progress((segment * 90 / total) as u8);

            prior = Some(video);
        }

        let uri = prior
            .and_then(|video| video.uri)
            .ok_or(EngineError::MissingFinalArtifact)?;

        progress.log("Downloading final video...");
        info!(job_id = %job_id, "Downloading final artifact");

        let bytes = self
            .veo
            .download(key, &uri)
            .await
            .map_err(EngineError::from_download)?;

        let path = self.store.store(job_id, &bytes).await?;

        info!(job_id = %job_id, path = %path, "Generation run complete");

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::store::DiskStore;

    const FAST_SUBMIT: &str = "/models/veo-3.1-fast-generate-preview:predictLongRunning";
    const STD_SUBMIT: &str = "/models/veo-3.1-generate-preview:predictLongRunning";

    fn orchestrator(server: &MockServer, dir: &tempfile::TempDir) -> Orchestrator<DiskStore> {
        let veo = VeoClient::new(reel_veo::VeoClientConfig {
            base_url: server.uri(),
            timeout: Duration::from_secs(5),
        })
        .unwrap();

        Orchestrator::new(
            veo,
            DiskStore::new(dir.path()),
            EngineConfig {
                poll_interval: Duration::from_millis(10),
                work_dir: dir.path().to_string_lossy().into_owned(),
            },
        )
    }

    fn done_operation(name: &str, uri: &str) -> serde_json::Value {
        json!({
            "name": name,
            "done": true,
            "response": {
                "generatedVideos": [ { "video": { "uri": uri } } ]
            }
        })
    }

    #[tokio::test]
    async fn test_single_segment_end_to_end() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        // Submit returns a pending handle; the first poll still reports
        // pending, the second reports done.
        Mock::given(method("POST"))
            .and(path(FAST_SUBMIT))
            .and(query_param("key", "test-key"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "name": "operations/op-1" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let final_uri = format!("{}/files/final?alt=media", server.uri());

        Mock::given(method("GET"))
            .and(path("/operations/op-1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "name": "operations/op-1", "done": false })),
            )
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/operations/op-1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(done_operation("operations/op-1", &final_uri)),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/files/final"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"mp4-bytes".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let orchestrator = orchestrator(&server, &dir);
        let (progress, mut rx) = ProgressSender::channel();
        let job_id = JobId::new();

        let output = orchestrator
            .generate(&ApiKey::new("test-key"), &job_id, "a cat in space", 1, &progress)
            .await
            .unwrap();

        let written = tokio::fs::read(&output).await.unwrap();
        assert_eq!(written, b"mp4-bytes");

        // First event announces segment 1 of 1.
        let first = rx.recv().await.unwrap();
        assert!(matches!(
            first,
            reel_models::WsMessage::SegmentStarted { segment: 1, total: 1 }
        ));

        // The submitted prompt is the caller's text, with no prior video.
        let requests = server.received_requests().await.unwrap();
        let submit = requests
            .iter()
            .find(|r| r.url.path().ends_with(":predictLongRunning"))
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&submit.body).unwrap();
        assert_eq!(body["prompt"], "a cat in space");
        assert!(body.get("video").is_none());
    }

    #[tokio::test]
    async fn test_three_segments_chain_in_order() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        let seg1_uri = format!("{}/files/seg1?alt=media", server.uri());
        let final_uri = format!("{}/files/final?alt=media", server.uri());

        // Segment 1: fast model, completes on submission.
        Mock::given(method("POST"))
            .and(path(FAST_SUBMIT))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(done_operation("operations/op-1", &seg1_uri)),
            )
            .expect(1)
            .mount(&server)
            .await;

        // Segments 2 and 3: standard model continuations.
        Mock::given(method("POST"))
            .and(path(STD_SUBMIT))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(done_operation("operations/op-n", &final_uri)),
            )
            .expect(2)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/files/final"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"chained".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let orchestrator = orchestrator(&server, &dir);
        let progress = ProgressSender::discard();
        let job_id = JobId::new();

        orchestrator
            .generate(&ApiKey::new("test-key"), &job_id, "a cat in space", 3, &progress)
            .await
            .unwrap();

        // Exactly three submissions, in order; segment 1 carries the user
        // prompt, segments 2 and 3 the continuation prompt plus the
        // preceding segment's video reference.
        let requests = server.received_requests().await.unwrap();
        let submits: Vec<serde_json::Value> = requests
            .iter()
            .filter(|r| r.url.path().ends_with(":predictLongRunning"))
            .map(|r| serde_json::from_slice(&r.body).unwrap())
            .collect();

        assert_eq!(submits.len(), 3);
        assert_eq!(submits[0]["prompt"], "a cat in space");
        assert!(submits[0].get("video").is_none());

        assert_eq!(submits[1]["prompt"], EXTENSION_PROMPT);
        assert_eq!(submits[1]["video"]["uri"], seg1_uri.as_str());

        assert_eq!(submits[2]["prompt"], EXTENSION_PROMPT);
        assert_eq!(submits[2]["video"]["uri"], final_uri.as_str());
    }

    #[tokio::test]
    async fn test_never_done_job_never_reaches_download() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        Mock::given(method("POST"))
            .and(path(FAST_SUBMIT))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "name": "operations/stuck" })),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/operations/stuck"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "name": "operations/stuck", "done": false })),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/files/final"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let orchestrator = orchestrator(&server, &dir);
        let progress = ProgressSender::discard();
        let job_id = JobId::new();

        let api_key = ApiKey::new("test-key");
        let run = orchestrator.generate(
            &api_key,
            &job_id,
            "a cat in space",
            1,
            &progress,
        );

        // The run stays suspended at the poll step.
        let outcome = tokio::time::timeout(Duration::from_millis(200), run).await;
        assert!(outcome.is_err(), "run must not finish while the job is pending");
    }

    #[tokio::test]
    async fn test_not_found_marker_aborts_with_credential_rejected() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        let seg1_uri = format!("{}/files/seg1?alt=media", server.uri());

        Mock::given(method("POST"))
            .and(path(FAST_SUBMIT))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(done_operation("operations/op-1", &seg1_uri)),
            )
            .mount(&server)
            .await;

        // The continuation submit fails with the provider's key-rotation
        // marker.
        Mock::given(method("POST"))
            .and(path(STD_SUBMIT))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": { "message": "Requested entity was not found." }
            })))
            .mount(&server)
            .await;

        let orchestrator = orchestrator(&server, &dir);
        let progress = ProgressSender::discard();
        let job_id = JobId::new();

        let err = orchestrator
            .generate(&ApiKey::new("rotated"), &job_id, "a cat in space", 2, &progress)
            .await
            .unwrap_err();

        assert!(err.is_credential_rejected());
    }

    #[tokio::test]
    async fn test_completed_job_without_video_fails_that_segment() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        Mock::given(method("POST"))
            .and(path(FAST_SUBMIT))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "operations/op-1",
                "done": true,
                "response": { "generatedVideos": [] }
            })))
            .mount(&server)
            .await;

        let orchestrator = orchestrator(&server, &dir);
        let progress = ProgressSender::discard();
        let job_id = JobId::new();

        let err = orchestrator
            .generate(&ApiKey::new("test-key"), &job_id, "a cat in space", 1, &progress)
            .await
            .unwrap_err();

        match err {
            EngineError::SegmentFailed { segment, .. } => assert_eq!(segment, 1),
            other => panic!("expected SegmentFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_final_video_without_uri_is_missing_artifact() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        Mock::given(method("POST"))
            .and(path(FAST_SUBMIT))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "operations/op-1",
                "done": true,
                "response": { "generatedVideos": [ { "video": {} } ] }
            })))
            .mount(&server)
            .await;

        let orchestrator = orchestrator(&server, &dir);
        let progress = ProgressSender::discard();
        let job_id = JobId::new();

        let err = orchestrator
            .generate(&ApiKey::new("test-key"), &job_id, "a cat in space", 1, &progress)
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::MissingFinalArtifact));
    }

    #[tokio::test]
    async fn test_download_404_aborts_with_credential_rejected() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        let final_uri = format!("{}/files/final?alt=media", server.uri());

        Mock::given(method("POST"))
            .and(path(FAST_SUBMIT))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(done_operation("operations/op-1", &final_uri)),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/files/final"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let orchestrator = orchestrator(&server, &dir);
        let progress = ProgressSender::discard();
        let job_id = JobId::new();

        let err = orchestrator
            .generate(&ApiKey::new("rotated"), &job_id, "a cat in space", 1, &progress)
            .await
            .unwrap_err();

        assert!(err.is_credential_rejected());
    }

    #[tokio::test]
    async fn test_missing_credential_makes_no_network_calls() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        let orchestrator = orchestrator(&server, &dir);
        let progress = ProgressSender::discard();
        let job_id = JobId::new();

        let err = orchestrator
            .generate(&ApiKey::new(""), &job_id, "a cat in space", 2, &progress)
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::CredentialMissing));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
