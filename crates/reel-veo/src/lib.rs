//! Client for the Veo generative-video API.
//!
//! This crate wraps the provider's long-running-operation surface: submit
//! a generation job, refresh its operation handle until done, and download
//! the finished artifact. The operation handle and video reference are
//! opaque provider values; they are never constructed locally.

pub mod client;
pub mod credential;
pub mod error;
pub mod types;

pub use client::{VeoClient, VeoClientConfig};
pub use credential::ApiKey;
pub use error::{VeoError, VeoResult};
pub use types::{
    GenerateVideosRequest, GenerationConfig, Operation, VeoModel, VideoReference,
};
