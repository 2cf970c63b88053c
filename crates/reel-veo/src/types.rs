//! Wire types for the Veo long-running-operation API.

use serde::{Deserialize, Serialize};

/// Veo model variants.
///
/// The fast variant trades some quality for turnaround and is used for the
/// opening segment; continuations go through the standard variant, which
/// accepts a prior video as extension input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VeoModel {
    /// Fast preview model, first segment only
    FastPreview,
    /// Standard preview model, used to extend a prior video
    Preview,
}

impl VeoModel {
    /// Provider model id.
    pub fn as_str(&self) -> &'static str {
        match self {
            VeoModel::FastPreview => "veo-3.1-fast-generate-preview",
            VeoModel::Preview => "veo-3.1-generate-preview",
        }
    }

    /// Model variant for a 1-based segment index.
    pub fn for_segment(segment: u32) -> Self {
        if segment <= 1 {
            VeoModel::FastPreview
        } else {
            VeoModel::Preview
        }
    }
}

/// Opaque handle to a provider-hosted video artifact.
///
/// Returned inside a completed operation; fed back to the provider as
/// continuation input, or resolved to a download URI for the final
/// segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoReference {
    /// Resolvable download URI, present on finished artifacts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

/// Generation request payload.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateVideosRequest {
    pub prompt: String,

    /// Prior segment's video, present on continuation requests only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoReference>,

    pub config: GenerationConfig,
}

impl GenerateVideosRequest {
    /// Build a request with the fixed output configuration.
    pub fn new(prompt: impl Into<String>, video: Option<VideoReference>) -> Self {
        Self {
            prompt: prompt.into(),
            video,
            config: GenerationConfig::default(),
        }
    }
}

/// Fixed output configuration: one 720p 16:9 video per request.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationConfig {
    #[serde(rename = "numberOfVideos")]
    pub number_of_videos: u32,
    pub resolution: String,
    #[serde(rename = "aspectRatio")]
    pub aspect_ratio: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            number_of_videos: 1,
            resolution: "720p".to_string(),
            aspect_ratio: "16:9".to_string(),
        }
    }
}

/// A provider-issued long-running operation handle.
///
/// Never constructed locally; obtained from a submit call and refreshed
/// via status polls until `done`.
#[derive(Debug, Clone, Deserialize)]
pub struct Operation {
    /// Provider-assigned operation name, used as the poll path.
    pub name: String,

    /// Whether the operation has finished (success or failure).
    #[serde(default)]
    pub done: bool,

    /// Result payload, present once done on success.
    #[serde(default)]
    pub response: Option<OperationResponse>,

    /// Failure payload, present once done on failure.
    #[serde(default)]
    pub error: Option<OperationError>,
}

impl Operation {
    /// First generated video of a completed operation, if any.
    pub fn first_video(&self) -> Option<&VideoReference> {
        self.response
            .as_ref()?
            .generated_videos
            .first()?
            .video
            .as_ref()
    }
}

/// Completed operation result.
#[derive(Debug, Clone, Deserialize)]
pub struct OperationResponse {
    #[serde(rename = "generatedVideos", default)]
    pub generated_videos: Vec<GeneratedVideo>,
}

/// One generated video entry.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedVideo {
    #[serde(default)]
    pub video: Option<VideoReference>,
}

/// Operation-level failure reported by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct OperationError {
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_for_segment() {
        assert_eq!(VeoModel::for_segment(1), VeoModel::FastPreview);
        assert_eq!(VeoModel::for_segment(2), VeoModel::Preview);
        assert_eq!(VeoModel::for_segment(4), VeoModel::Preview);
    }

    #[test]
    fn test_request_serialization_skips_absent_video() {
        let request = GenerateVideosRequest::new("a cat in space", None);
        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("\"video\""));
        assert!(json.contains("\"numberOfVideos\":1"));
        assert!(json.contains("\"aspectRatio\":\"16:9\""));
    }

    #[test]
    fn test_request_serialization_includes_prior_video() {
        let prior = VideoReference {
            uri: Some("https://example.com/v.mp4?alt=media".to_string()),
        };
        let request = GenerateVideosRequest::new("extend it", Some(prior));
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"video\""));
    }

    #[test]
    fn test_operation_deserialization() {
        let json = r#"{
            "name": "models/veo-3.1-generate-preview/operations/abc123",
            "done": true,
            "response": {
                "generatedVideos": [
                    { "video": { "uri": "https://example.com/v.mp4?alt=media" } }
                ]
            }
        }"#;

        let op: Operation = serde_json::from_str(json).unwrap();
        assert!(op.done);
        let video = op.first_video().expect("video present");
        assert!(video.uri.as_deref().unwrap().contains("alt=media"));
    }

    #[test]
    fn test_pending_operation_has_no_video() {
        let json = r#"{ "name": "operations/xyz" }"#;
        let op: Operation = serde_json::from_str(json).unwrap();
        assert!(!op.done);
        assert!(op.first_video().is_none());
    }
}
