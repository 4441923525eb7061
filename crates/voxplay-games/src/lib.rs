//! Command matchers and game state machines for VoxPlay
//!
//! Each game pairs a pure command matcher (transcript + visible state in,
//! zero or one typed action out) with a state machine that consumes actions
//! and advances score/step/completion through the shared `GamePhase`
//! lifecycle. Matchers never mutate state; they work on the trimmed,
//! lowercased transcript only.

pub mod carpentry;
pub mod catalog;
pub mod coding;
pub mod feedback;
pub mod first_aid;
pub mod quiz;
pub mod rhythm;
pub mod steps;
pub mod story;

pub use catalog::{GameCategory, GameDescriptor};
pub use feedback::{Feedback, FeedbackKind};

use voxplay_foundation::phase::{GamePhase, PhaseTracker};

/// Normalize a transcript the way every matcher expects it.
pub fn normalize(transcript: &str) -> String {
    transcript.trim().to_lowercase()
}

/// Apply a phase transition the session has already validated by checking
/// the current phase. A rejection here is a programming error; it is logged
/// and the caller backs out.
pub(crate) fn advance_phase(tracker: &PhaseTracker, next: GamePhase) -> bool {
    match tracker.transition(next) {
        Ok(()) => true,
        Err(e) => {
            tracing::error!("Unexpected phase rejection: {}", e);
            false
        }
    }
}
