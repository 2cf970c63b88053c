//! Shared data models for the ReelForge backend.
//!
//! This crate provides Serde-serializable types for:
//! - Generation jobs and their lifecycle states
//! - Duration presets offered to the caller
//! - WebSocket progress message schemas

pub mod job;
pub mod preset;
pub mod ws;

// Re-export common types
pub use job::{GenerationJob, JobId, JobState};
pub use preset::{DurationPreset, ParsePresetError, LOADING_MESSAGES};
pub use ws::{WsMessage, WsMessageType};
