//! Error types for TTS functionality

use thiserror::Error;

/// TTS error types
#[derive(Error, Debug)]
pub enum TtsError {
    /// No synthesizer available in this environment
    #[error("TTS engine not available: {0}")]
    EngineNotAvailable(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Synthesis failed
    #[error("Synthesis failed: {0}")]
    SynthesisError(String),

    /// Invalid text input
    #[error("Invalid text input: {0}")]
    InvalidInput(String),
}

/// Result type for TTS operations
pub type TtsResult<T> = Result<T, TtsError>;
