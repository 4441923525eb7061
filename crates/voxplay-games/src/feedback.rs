//! Feedback rendered between a matched command and the next game item

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Correct,
    Incorrect,
    StepCompleted,
    /// Answer to a tools/details query; the game does not advance
    Info,
    Success,
    Retry,
    Complete,
}

/// What the UI shows (and optionally speaks) during the feedback dwell.
#[derive(Debug, Clone)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub message: String,
    /// Spoken confirmation, if any
    pub spoken: Option<String>,
    /// How long the feedback stays on screen before the game advances
    pub dwell: Duration,
}

impl Feedback {
    pub fn new(kind: FeedbackKind, message: impl Into<String>, dwell: Duration) -> Self {
        Self {
            kind,
            message: message.into(),
            spoken: None,
            dwell,
        }
    }

    pub fn with_spoken(mut self, spoken: impl Into<String>) -> Self {
        self.spoken = Some(spoken.into());
        self
    }
}
