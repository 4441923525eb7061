//! Core types for the voice session layer

use serde::{Deserialize, Serialize};
use voxplay_foundation::error::VoiceError;

/// Recognition event types
#[derive(Debug, Clone)]
pub enum RecognitionEvent {
    /// Interim hypothesis (utterance still in progress)
    Partial {
        utterance_id: u64,
        text: String,
        /// Confidence score (0.0-1.0)
        confidence: f32,
    },
    /// Final hypothesis (utterance complete)
    Final {
        utterance_id: u64,
        text: String,
        confidence: f32,
    },
    /// Recognition failed
    Error(VoiceError),
    /// The recognizer handle shut down on its own
    Ended,
}

/// Recognition configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionConfig {
    /// BCP-47 language tag for capture
    pub language: String,
    /// Keep recognizing across utterances instead of stopping after one
    pub continuous: bool,
    /// Emit interim (partial) hypotheses
    pub interim_results: bool,
    /// Maximum alternatives per result
    pub max_alternatives: u32,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            continuous: true,
            interim_results: true,
            max_alternatives: 1,
        }
    }
}

/// Read-only view of the live voice session.
///
/// `transcript` always holds the most recent hypothesis only; results
/// replace it, they never append.
#[derive(Debug, Clone, Default)]
pub struct VoiceSnapshot {
    pub listening: bool,
    pub transcript: String,
    pub confidence: f32,
    pub error: Option<VoiceError>,
}

/// One transcript publication to matchers. `seq` increases on every update
/// so identical texts are still observed as distinct updates.
#[derive(Debug, Clone, Default)]
pub struct TranscriptUpdate {
    pub seq: u64,
    pub text: String,
    pub confidence: f32,
}
