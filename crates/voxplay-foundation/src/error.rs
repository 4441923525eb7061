use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoxPlayError {
    #[error("Voice session error: {0}")]
    Voice(#[from] VoiceError),

    #[error("User store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Shutdown requested")]
    ShutdownRequested,

    #[error("Fatal error, cannot recover: {0}")]
    Fatal(String),
}

/// Recognition error taxonomy. Mirrors the fixed set of codes the platform
/// speech capability can report; everything else collapses into `Unknown`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VoiceError {
    #[error("Speech recognition is not supported here")]
    Unsupported,

    #[error("No speech detected")]
    NoSpeech,

    #[error("Recognition aborted")]
    Aborted,

    #[error("Microphone unavailable or capture failed")]
    AudioCapture,

    #[error("Network unavailable for speech recognition")]
    Network,

    #[error("Microphone permission denied")]
    NotAllowed,

    #[error("Speech recognition service not allowed")]
    ServiceNotAllowed,

    #[error("Unknown recognition error: {code}")]
    Unknown { code: String },
}

impl VoiceError {
    /// Map a raw platform error code to the taxonomy.
    pub fn from_platform_code(code: &str) -> Self {
        match code {
            "no-speech" => VoiceError::NoSpeech,
            "aborted" => VoiceError::Aborted,
            "audio-capture" => VoiceError::AudioCapture,
            "network" => VoiceError::Network,
            "not-allowed" => VoiceError::NotAllowed,
            "service-not-allowed" => VoiceError::ServiceNotAllowed,
            other => VoiceError::Unknown {
                code: other.to_string(),
            },
        }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("An account with email {email} already exists")]
    DuplicateEmail { email: String },

    #[error("User store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("User store serialization error: {0}")]
    Serialization(String),
}

#[derive(Debug, Clone)]
pub enum RecoveryStrategy {
    /// The user may simply try `start_listening` again.
    Retry { delay: Duration },
    /// Wait for the connectivity signal to come back online first.
    WaitForNetwork,
    /// The capability is missing; the voice UI stays disabled.
    Disable,
}

impl VoiceError {
    pub fn recovery_strategy(&self) -> RecoveryStrategy {
        match self {
            VoiceError::Unsupported => RecoveryStrategy::Disable,
            VoiceError::Network => RecoveryStrategy::WaitForNetwork,
            _ => RecoveryStrategy::Retry {
                delay: Duration::from_millis(250),
            },
        }
    }

    /// Human-readable notice shown alongside the game UI.
    pub fn user_message(&self) -> &'static str {
        match self {
            VoiceError::Unsupported => "Voice control is not supported in this environment",
            VoiceError::NoSpeech => "Didn't catch that - please speak again",
            VoiceError::Aborted => "Listening was interrupted",
            VoiceError::AudioCapture => "Could not access the microphone",
            VoiceError::Network => "Voice recognition needs an internet connection",
            VoiceError::NotAllowed => "Microphone permission was denied",
            VoiceError::ServiceNotAllowed => "The speech service is not allowed",
            VoiceError::Unknown { .. } => "Something went wrong with voice recognition",
        }
    }
}
