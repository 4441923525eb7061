//! Speech recognition session layer for VoxPlay
//!
//! This crate provides the abstractions between the platform speech
//! capability and the games: the `SpeechRecognizer` trait, recognition
//! events, and the `VoiceSessionManager` that owns the listening state.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use voxplay_foundation::error::VoiceError;

pub mod connectivity;
pub mod engines;
pub mod metrics;
pub mod session;
pub mod types;

pub use connectivity::ConnectivityMonitor;
pub use metrics::SessionMetrics;
pub use session::VoiceSessionManager;
pub use types::{RecognitionConfig, RecognitionEvent, TranscriptUpdate, VoiceSnapshot};

/// Generates unique utterance IDs
static UTTERANCE_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generate a unique utterance ID
pub fn next_utterance_id() -> u64 {
    UTTERANCE_ID_COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Handle to a continuous speech-recognition capability.
///
/// Implementations deliver `RecognitionEvent`s through the channel supplied
/// at construction. `start` and `stop` return immediately from the caller's
/// perspective; in-flight events may still arrive after `stop` and are
/// discarded by the session manager once it is no longer listening.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Begin continuous capture with the given configuration.
    async fn start(&mut self, config: &RecognitionConfig) -> Result<(), VoiceError>;

    /// Request the platform to stop capturing. Tolerates not running.
    async fn stop(&mut self) -> Result<(), VoiceError>;

    /// Whether the capability exists at all in this environment.
    fn is_available(&self) -> bool;
}
