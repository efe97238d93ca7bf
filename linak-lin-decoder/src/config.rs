//! Decoder configuration types
//!
//! The only behavioural switch of the decoder is whether header-only frames are
//! reported. Everything about rendering lives in the application layer.

use serde::{Deserialize, Serialize};

/// Configuration for the decoder library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Emit `Empty` records for frames with no payload (false = drop them)
    #[serde(default = "default_true")]
    pub show_empty_frames: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            show_empty_frames: true,
        }
    }
}

impl DecoderConfig {
    /// Create a new decoder configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: show or hide empty frames
    pub fn with_empty_frames(mut self, enabled: bool) -> Self {
        self.show_empty_frames = enabled;
        self
    }
}
