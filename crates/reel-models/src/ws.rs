//! WebSocket message types.
//!
//! Progress envelope streamed to the caller while a generation job runs.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// WebSocket message types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum WsMessageType {
    /// Log message
    Log,
    /// Progress update
    Progress,
    /// Error message
    Error,
    /// Generation complete
    Done,
}

impl WsMessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WsMessageType::Log => "log",
            WsMessageType::Progress => "progress",
            WsMessageType::Error => "error",
            WsMessageType::Done => "done",
        }
    }
}

/// WebSocket message envelope.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsMessage {
    /// Log message with timestamp
    Log {
        message: String,
        timestamp: DateTime<Utc>,
    },

    /// Progress update (0-100)
    Progress { value: u8 },

    /// A segment generation job was submitted
    SegmentStarted {
        /// 1-based segment index
        segment: u32,
        /// Total number of segments in the chain
        total: u32,
    },

    /// Error message
    Error {
        message: String,
        timestamp: DateTime<Utc>,
    },

    /// Generation complete
    Done {
        /// Path of the playable output video
        output: String,
    },
}

impl WsMessage {
    /// Create a log message.
    pub fn log(message: impl Into<String>) -> Self {
        WsMessage::Log {
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a progress message.
    pub fn progress(value: u8) -> Self {
        WsMessage::Progress {
            value: value.min(100),
        }
    }

    /// Create a segment started message.
    pub fn segment_started(segment: u32, total: u32) -> Self {
        WsMessage::SegmentStarted { segment, total }
    }

    /// Create an error message.
    pub fn error(message: impl Into<String>) -> Self {
        let now = Utc::now();
        let ts = now.format("%H:%M:%S").to_string();
        let message = format!("[{}] {}", ts, message.into());
        WsMessage::Error {
            message,
            timestamp: now,
        }
    }

    /// Create a done message.
    pub fn done(output: impl Into<String>) -> Self {
        WsMessage::Done {
            output: output.into(),
        }
    }

    /// Get the message type.
    pub fn message_type(&self) -> WsMessageType {
        match self {
            WsMessage::Log { .. } => WsMessageType::Log,
            WsMessage::Progress { .. } => WsMessageType::Progress,
            WsMessage::SegmentStarted { .. } => WsMessageType::Progress,
            WsMessage::Error { .. } => WsMessageType::Error,
            WsMessage::Done { .. } => WsMessageType::Done,
        }
    }

    /// Whether this message ends the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, WsMessage::Done { .. } | WsMessage::Error { .. })
    }
}
