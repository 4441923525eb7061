//! Core types for text-to-speech functionality

use serde::{Deserialize, Serialize};

/// TTS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TtsConfig {
    /// Enable/disable spoken feedback
    pub enabled: bool,
    /// Speaking rate (1.0 is normal)
    pub rate: f32,
    /// Voice pitch (0.0-2.0, 1.0 is normal)
    pub pitch: f32,
    /// Volume (0.0-1.0)
    pub volume: f32,
    /// BCP-47 language tag for the voice
    pub language: String,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            rate: 1.0,
            pitch: 1.0,
            volume: 0.8,
            language: "en-US".to_string(),
        }
    }
}

/// Options for an individual utterance
#[derive(Debug, Clone, Default)]
pub struct SynthesisOptions {
    /// Override speaking rate for this utterance
    pub rate: Option<f32>,
    /// Override pitch for this utterance
    pub pitch: Option<f32>,
    /// Override volume for this utterance
    pub volume: Option<f32>,
    /// Cancel any in-flight utterance before speaking
    pub interrupt: bool,
}
