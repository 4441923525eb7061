//! Rhythm game: sing a note sequence back
//!
//! The matcher scans the transcript for solfège tokens, merges "high"/"low"
//! modifiers into the preceding note, and scores positional overlap against
//! the round's target sequence.

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;

use voxplay_foundation::phase::{GamePhase, PhaseTracker};

use crate::feedback::{Feedback, FeedbackKind};
use crate::{advance_phase, normalize};

const DWELL: Duration = Duration::from_secs(2);

/// Minimum positional overlap for a round to pass.
pub const SUCCESS_THRESHOLD: f32 = 0.7;

static NOTE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(do|re|mi|fa|sol|la|ti|high|low)\b").unwrap());

/// Scan a transcript for note tokens. A "high"/"low" token attaches to the
/// note before it ("do high" becomes one note); a leading or doubled
/// modifier is dropped.
pub fn extract_notes(transcript: &str) -> Vec<String> {
    let spoken = normalize(transcript);
    let mut notes: Vec<String> = Vec::new();
    for token in NOTE_RE.find_iter(&spoken) {
        let token = token.as_str();
        if token == "high" || token == "low" {
            if let Some(last) = notes.last_mut() {
                if !last.contains(' ') {
                    *last = format!("{} {}", last, token);
                }
            }
        } else {
            notes.push(token.to_string());
        }
    }
    notes
}

/// Fraction of target positions the detected sequence got right.
pub fn overlap_ratio(detected: &[String], target: &[String]) -> f32 {
    if target.is_empty() {
        return 1.0;
    }
    let hits = detected
        .iter()
        .zip(target.iter())
        .filter(|(d, t)| d == t)
        .count();
    hits as f32 / target.len() as f32
}

#[derive(Debug, Clone, PartialEq)]
pub enum RhythmAction {
    Success { ratio: f32 },
    Retry { ratio: f32 },
}

/// Pure matcher: no note tokens means no action at all.
pub fn match_rhythm(transcript: &str, target: &[String]) -> Option<RhythmAction> {
    let detected = extract_notes(transcript);
    if detected.is_empty() {
        return None;
    }
    let ratio = overlap_ratio(&detected, target);
    if ratio >= SUCCESS_THRESHOLD {
        Some(RhythmAction::Success { ratio })
    } else {
        Some(RhythmAction::Retry { ratio })
    }
}

pub struct RhythmSession {
    rounds: Vec<Vec<String>>,
    current: usize,
    passed: u32,
    pending: Option<RhythmAction>,
    finished: bool,
    phase: PhaseTracker,
}

impl RhythmSession {
    pub fn new(rounds: Vec<Vec<String>>) -> Self {
        Self {
            rounds,
            current: 0,
            passed: 0,
            pending: None,
            finished: false,
            phase: PhaseTracker::new(),
        }
    }

    pub fn begin(&mut self) -> bool {
        advance_phase(&self.phase, GamePhase::Listening)
    }

    pub fn current_target(&self) -> Option<&[String]> {
        self.rounds.get(self.current).map(|r| r.as_slice())
    }

    pub fn on_transcript(&mut self, transcript: &str) -> Option<Feedback> {
        if self.phase.current() != GamePhase::Listening {
            return None;
        }
        let target = self.rounds.get(self.current)?;
        let action = match_rhythm(transcript, target)?;
        if !advance_phase(&self.phase, GamePhase::Evaluating) {
            return None;
        }

        let feedback = match &action {
            RhythmAction::Success { ratio } => {
                self.passed += 1;
                Feedback::new(
                    FeedbackKind::Success,
                    format!("Great! You hit {:.0}% of the notes.", ratio * 100.0),
                    DWELL,
                )
                .with_spoken("You got it!")
            }
            RhythmAction::Retry { ratio } => Feedback::new(
                FeedbackKind::Retry,
                format!("Only {:.0}% of the notes matched. Try again!", ratio * 100.0),
                DWELL,
            )
            .with_spoken("Almost, listen once more."),
        };
        self.pending = Some(action);
        advance_phase(&self.phase, GamePhase::Feedback);
        Some(feedback)
    }

    /// Leave the feedback dwell: a passed round moves forward, a retry
    /// replays the same target.
    pub fn advance(&mut self) -> GamePhase {
        if self.phase.current() != GamePhase::Feedback {
            return self.phase.current();
        }
        if matches!(self.pending.take(), Some(RhythmAction::Success { .. })) {
            self.current += 1;
            if self.current == self.rounds.len() {
                self.finished = true;
                advance_phase(&self.phase, GamePhase::Complete);
                return self.phase.current();
            }
        }
        advance_phase(&self.phase, GamePhase::Listening);
        self.phase.current()
    }

    pub fn restart(&mut self) -> bool {
        if self.phase.current() != GamePhase::Complete {
            return false;
        }
        self.current = 0;
        self.passed = 0;
        self.pending = None;
        self.finished = false;
        advance_phase(&self.phase, GamePhase::Idle)
    }

    pub fn rounds_passed(&self) -> u32 {
        self.passed
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn phase(&self) -> GamePhase {
        self.phase.current()
    }
}

/// Built-in rounds for the rhythm screen.
pub fn sample_rounds() -> Vec<Vec<String>> {
    fn notes(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }
    vec![
        notes(&["do", "re", "mi"]),
        notes(&["mi", "fa", "sol", "la"]),
        notes(&["do high", "ti", "la", "sol"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notes(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn extracts_notes_ignoring_filler_words() {
        assert_eq!(
            extract_notes("okay here goes do re and then mi"),
            notes(&["do", "re", "mi"])
        );
    }

    #[test]
    fn modifiers_merge_with_preceding_note() {
        assert_eq!(
            extract_notes("do high re do"),
            notes(&["do high", "re", "do"])
        );
        // leading modifier has nothing to attach to
        assert_eq!(extract_notes("high do re"), notes(&["do", "re"]));
        // a second modifier on the same note is dropped
        assert_eq!(extract_notes("do high low"), notes(&["do high"]));
    }

    #[test]
    fn perfect_match_succeeds() {
        let target = notes(&["do", "re", "mi"]);
        let action = match_rhythm("do re mi", &target).unwrap();
        assert_eq!(action, RhythmAction::Success { ratio: 1.0 });
    }

    #[test]
    fn two_of_three_is_below_threshold() {
        let target = notes(&["do", "re", "mi"]);
        let detected = notes(&["do", "fa", "mi"]);
        let ratio = overlap_ratio(&detected, &target);
        assert!((ratio - 2.0 / 3.0).abs() < 1e-6);
        assert!(matches!(
            match_rhythm("do fa mi", &target),
            Some(RhythmAction::Retry { .. })
        ));
    }

    #[test]
    fn no_note_tokens_means_no_action() {
        let target = notes(&["do", "re", "mi"]);
        assert_eq!(match_rhythm("hello there", &target), None);
    }

    #[test]
    fn retry_replays_the_same_round() {
        let mut session = RhythmSession::new(sample_rounds());
        session.begin();

        let fb = session.on_transcript("do fa mi").unwrap();
        assert_eq!(fb.kind, FeedbackKind::Retry);
        assert_eq!(session.advance(), GamePhase::Listening);
        assert_eq!(session.current_target().unwrap(), &notes(&["do", "re", "mi"])[..]);
    }

    #[test]
    fn passing_every_round_completes_the_session() {
        let mut session = RhythmSession::new(vec![notes(&["do", "re"]), notes(&["mi", "fa"])]);
        session.begin();

        session.on_transcript("do re").unwrap();
        assert_eq!(session.advance(), GamePhase::Listening);
        session.on_transcript("mi fa").unwrap();
        assert_eq!(session.advance(), GamePhase::Complete);
        assert!(session.is_finished());
        assert_eq!(session.rounds_passed(), 2);
    }
}
