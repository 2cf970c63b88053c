//! Duration presets offered to the caller.

use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed duration presets, each mapping to a segment count.
///
/// The displayed duration is approximate: segments overlap slightly when
/// the provider extends a video, so four segments land around 15 seconds
/// rather than 16.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DurationPreset {
    /// One segment, ~4 seconds
    Short,
    /// Two segments, ~8 seconds
    Medium,
    /// Three segments, ~12 seconds
    Long,
    /// Four segments, ~15 seconds
    Epic,
}

impl DurationPreset {
    /// All presets in display order.
    pub fn all() -> &'static [DurationPreset] {
        &[
            DurationPreset::Short,
            DurationPreset::Medium,
            DurationPreset::Long,
            DurationPreset::Epic,
        ]
    }

    /// Number of chained segments this preset generates.
    pub fn segment_count(&self) -> u32 {
        match self {
            DurationPreset::Short => 1,
            DurationPreset::Medium => 2,
            DurationPreset::Long => 3,
            DurationPreset::Epic => 4,
        }
    }

    /// Approximate duration of the assembled video, in seconds.
    pub fn approx_seconds(&self) -> u32 {
        match self {
            DurationPreset::Short => 4,
            DurationPreset::Medium => 8,
            DurationPreset::Long => 12,
            DurationPreset::Epic => 15,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            DurationPreset::Short => "Short",
            DurationPreset::Medium => "Medium",
            DurationPreset::Long => "Long",
            DurationPreset::Epic => "Epic",
        }
    }
}

/// Error parsing a preset name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown duration preset: {0}")]
pub struct ParsePresetError(String);

impl FromStr for DurationPreset {
    type Err = ParsePresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "short" => Ok(DurationPreset::Short),
            "medium" => Ok(DurationPreset::Medium),
            "long" => Ok(DurationPreset::Long),
            "epic" => Ok(DurationPreset::Epic),
            other => Err(ParsePresetError(other.to_string())),
        }
    }
}

/// Rotating cosmetic loading lines shown while a job is in flight.
pub const LOADING_MESSAGES: &[&str] = &[
    "Warming up the AI director...",
    "Scouting for digital locations...",
    "Casting virtual actors...",
    "Polishing the script...",
    "Adjusting the lighting...",
    "Rendering the first scene...",
    "Adding special effects...",
    "Composing the soundtrack...",
    "Finalizing the director's cut...",
    "Preparing for the premiere...",
];
