//! Story builder: spoken sentences grow a story
//!
//! Control phrases take priority over free text; anything else that was
//! actually heard becomes the next sentence of the story.

use std::time::Duration;

use voxplay_foundation::phase::{GamePhase, PhaseTracker};

use crate::feedback::{Feedback, FeedbackKind};
use crate::{advance_phase, normalize};

const DWELL: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoryAction {
    AddSentence(String),
    ReadBack,
    StartOver,
    Finish,
}

/// Pure matcher for the story builder.
pub fn match_story_command(transcript: &str) -> Option<StoryAction> {
    let spoken = normalize(transcript);
    if spoken.is_empty() {
        return None;
    }
    if spoken.contains("the end") {
        return Some(StoryAction::Finish);
    }
    if spoken.contains("start over") {
        return Some(StoryAction::StartOver);
    }
    if spoken.contains("read my story") || spoken.contains("read the story") {
        return Some(StoryAction::ReadBack);
    }
    Some(StoryAction::AddSentence(transcript.trim().to_string()))
}

pub struct StorySession {
    sentences: Vec<String>,
    pending: Option<StoryAction>,
    finished: bool,
    phase: PhaseTracker,
}

impl Default for StorySession {
    fn default() -> Self {
        Self::new()
    }
}

impl StorySession {
    pub fn new() -> Self {
        Self {
            sentences: Vec::new(),
            pending: None,
            finished: false,
            phase: PhaseTracker::new(),
        }
    }

    pub fn begin(&mut self) -> bool {
        advance_phase(&self.phase, GamePhase::Listening)
    }

    pub fn on_transcript(&mut self, transcript: &str) -> Option<Feedback> {
        if self.phase.current() != GamePhase::Listening {
            return None;
        }
        let action = match_story_command(transcript)?;
        if !advance_phase(&self.phase, GamePhase::Evaluating) {
            return None;
        }

        let feedback = match &action {
            StoryAction::AddSentence(sentence) => {
                self.sentences.push(sentence.clone());
                Feedback::new(
                    FeedbackKind::Info,
                    format!("Added: \"{}\"", sentence),
                    DWELL,
                )
                .with_spoken("And then?")
            }
            StoryAction::ReadBack => Feedback::new(
                FeedbackKind::Info,
                self.story_text(),
                DWELL,
            )
            .with_spoken(self.story_text()),
            StoryAction::StartOver => {
                self.sentences.clear();
                Feedback::new(FeedbackKind::Info, "Starting a fresh story.", DWELL)
                    .with_spoken("Okay, once upon a time...")
            }
            StoryAction::Finish => Feedback::new(
                FeedbackKind::Complete,
                format!("The end! Your story has {} sentences.", self.sentences.len()),
                DWELL,
            )
            .with_spoken(self.story_text()),
        };
        self.pending = Some(action);
        advance_phase(&self.phase, GamePhase::Feedback);
        Some(feedback)
    }

    pub fn advance(&mut self) -> GamePhase {
        if self.phase.current() != GamePhase::Feedback {
            return self.phase.current();
        }
        if matches!(self.pending.take(), Some(StoryAction::Finish)) {
            self.finished = true;
            advance_phase(&self.phase, GamePhase::Complete);
        } else {
            advance_phase(&self.phase, GamePhase::Listening);
        }
        self.phase.current()
    }

    pub fn restart(&mut self) -> bool {
        if self.phase.current() != GamePhase::Complete {
            return false;
        }
        self.sentences.clear();
        self.pending = None;
        self.finished = false;
        advance_phase(&self.phase, GamePhase::Idle)
    }

    pub fn story_text(&self) -> String {
        if self.sentences.is_empty() {
            "Your story is empty so far.".to_string()
        } else {
            self.sentences.join(" ")
        }
    }

    pub fn sentences(&self) -> &[String] {
        &self.sentences
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn phase(&self) -> GamePhase {
        self.phase.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_phrases_take_priority() {
        assert_eq!(match_story_command("and that was THE END"), Some(StoryAction::Finish));
        assert_eq!(match_story_command("let's start over"), Some(StoryAction::StartOver));
        assert_eq!(
            match_story_command("please read my story"),
            Some(StoryAction::ReadBack)
        );
        assert_eq!(match_story_command("   "), None);
    }

    #[test]
    fn free_text_becomes_a_sentence() {
        assert_eq!(
            match_story_command("  The dragon woke up.  "),
            Some(StoryAction::AddSentence("The dragon woke up.".to_string()))
        );
    }

    #[test]
    fn session_collects_sentences_and_finishes() {
        let mut session = StorySession::new();
        session.begin();

        session.on_transcript("Once there was a fox.").unwrap();
        session.advance();
        session.on_transcript("It found a hat.").unwrap();
        session.advance();
        assert_eq!(session.sentences().len(), 2);
        assert_eq!(session.story_text(), "Once there was a fox. It found a hat.");

        let fb = session.on_transcript("the end").unwrap();
        assert_eq!(fb.kind, FeedbackKind::Complete);
        assert_eq!(session.advance(), GamePhase::Complete);
        assert!(session.is_finished());
    }

    #[test]
    fn start_over_clears_but_keeps_playing() {
        let mut session = StorySession::new();
        session.begin();
        session.on_transcript("A line.").unwrap();
        session.advance();
        session.on_transcript("start over").unwrap();
        assert_eq!(session.advance(), GamePhase::Listening);
        assert!(session.sentences().is_empty());
    }
}
