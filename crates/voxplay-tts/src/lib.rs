//! Text-to-speech abstraction layer for VoxPlay
//!
//! Games speak questions, instructions, and feedback through the
//! `SpeechSynthesizer` trait; the host environment supplies the actual
//! voice. Synthesis is asynchronous and cancellable.

use std::sync::atomic::{AtomicU64, Ordering};

pub mod engine;
pub mod error;
pub mod types;

pub use engine::{ConsoleSynthesizer, SpeechSynthesizer, SynthesisEvent};
pub use error::{TtsError, TtsResult};
pub use types::{SynthesisOptions, TtsConfig};

/// Generates unique synthesis IDs
static SYNTHESIS_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generate a unique synthesis ID
pub fn next_synthesis_id() -> u64 {
    SYNTHESIS_ID_COUNTER.fetch_add(1, Ordering::SeqCst)
}
