//! Step-based trainer shared by the carpentry and first-aid games
//!
//! A trainer walks an ordered list of steps. The matcher recognizes step
//! completion (by the step's own command, its name, or a generic phrase)
//! and two query commands that answer questions without advancing.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use voxplay_foundation::phase::{GamePhase, PhaseTracker};

use crate::feedback::{Feedback, FeedbackKind};
use crate::{advance_phase, normalize};

const DWELL: Duration = Duration::from_millis(1500);

/// One immutable step from the static catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepDefinition {
    pub name: String,
    pub details: String,
    pub required_items: Vec<String>,
    /// The phrase that marks this specific step done
    pub match_command: String,
}

impl StepDefinition {
    pub fn new(name: &str, details: &str, required_items: &[&str], match_command: &str) -> Self {
        Self {
            name: name.to_string(),
            details: details.to_string(),
            required_items: required_items.iter().map(|s| s.to_string()).collect(),
            match_command: match_command.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAction {
    CompleteStep,
    QueryTools,
    QueryDetails,
}

/// Pure matcher for the current step. Queries take priority so that e.g.
/// "explain this step" is never read as a completion.
pub fn match_step_command(transcript: &str, step: &StepDefinition) -> Option<StepAction> {
    let spoken = normalize(transcript);
    if spoken.is_empty() {
        return None;
    }

    const TOOL_TRIGGERS: [&str; 4] = ["what tools", "which tools", "required items", "what do i need"];
    if TOOL_TRIGGERS.iter().any(|t| spoken.contains(t)) {
        return Some(StepAction::QueryTools);
    }

    const DETAIL_TRIGGERS: [&str; 3] = ["details", "explain", "how do i"];
    if DETAIL_TRIGGERS.iter().any(|t| spoken.contains(t)) {
        return Some(StepAction::QueryDetails);
    }

    if spoken.contains(&step.match_command.to_lowercase())
        || spoken.contains(&step.name.to_lowercase())
        || spoken.contains("next step")
        || spoken.contains("complete step")
    {
        return Some(StepAction::CompleteStep);
    }

    None
}

pub struct StepTrainer {
    steps: Vec<StepDefinition>,
    /// Names of completed steps, in completion order. Append-only until
    /// restart; duplicates cannot occur because the index is derived from
    /// this list's length.
    completed: Vec<String>,
    advisory_on_unmatched: bool,
    advisory: Option<String>,
    pending: Option<StepAction>,
    finished: bool,
    phase: PhaseTracker,
}

impl StepTrainer {
    pub fn new(steps: Vec<StepDefinition>, advisory_on_unmatched: bool) -> Self {
        Self {
            steps,
            completed: Vec::new(),
            advisory_on_unmatched,
            advisory: None,
            pending: None,
            finished: false,
            phase: PhaseTracker::new(),
        }
    }

    pub fn begin(&mut self) -> bool {
        advance_phase(&self.phase, GamePhase::Listening)
    }

    pub fn current_step(&self) -> Option<&StepDefinition> {
        self.steps.get(self.completed.len())
    }

    /// Feed the latest transcript. Unrecognized commands keep the trainer
    /// listening; the carpentry variant also surfaces an advisory string.
    pub fn on_transcript(&mut self, transcript: &str) -> Option<Feedback> {
        if self.phase.current() != GamePhase::Listening {
            return None;
        }
        let step = self.steps.get(self.completed.len())?;
        let Some(action) = match_step_command(transcript, step) else {
            if self.advisory_on_unmatched && !normalize(transcript).is_empty() {
                self.advisory = Some(format!(
                    "Didn't recognize \"{}\". Try \"next step\" or ask \"what tools\".",
                    transcript.trim()
                ));
            }
            return None;
        };

        if !advance_phase(&self.phase, GamePhase::Evaluating) {
            return None;
        }
        self.advisory = None;
        let feedback = match action {
            StepAction::CompleteStep => Feedback::new(
                FeedbackKind::StepCompleted,
                format!("Step complete: {}", step.name),
                DWELL,
            )
            .with_spoken(format!("Nice work, {} is done.", step.name)),
            StepAction::QueryTools => Feedback::new(
                FeedbackKind::Info,
                format!("You will need: {}", step.required_items.join(", ")),
                DWELL,
            )
            .with_spoken(format!("You will need {}", step.required_items.join(", "))),
            StepAction::QueryDetails => {
                Feedback::new(FeedbackKind::Info, step.details.clone(), DWELL)
                    .with_spoken(step.details.clone())
            }
        };
        self.pending = Some(action);
        advance_phase(&self.phase, GamePhase::Feedback);
        Some(feedback)
    }

    /// Leave the feedback dwell. Completions append to the done list and
    /// may finish the trainer; queries just resume listening.
    pub fn advance(&mut self) -> GamePhase {
        if self.phase.current() != GamePhase::Feedback {
            return self.phase.current();
        }
        if self.pending.take() == Some(StepAction::CompleteStep) {
            if let Some(step) = self.steps.get(self.completed.len()) {
                self.completed.push(step.name.clone());
            }
            if self.completed.len() == self.steps.len() {
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
        self.completed.clear();
        self.advisory = None;
        self.pending = None;
        self.finished = false;
        advance_phase(&self.phase, GamePhase::Idle)
    }

    pub fn completed_steps(&self) -> &[String] {
        &self.completed
    }

    pub fn advisory(&self) -> Option<&str> {
        self.advisory.as_deref()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn phase(&self) -> GamePhase {
        self.phase.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps() -> Vec<StepDefinition> {
        vec![
            StepDefinition::new(
                "measure the board",
                "Mark the cut line at 40 centimeters.",
                &["tape measure", "pencil"],
                "done measuring",
            ),
            StepDefinition::new(
                "cut the board",
                "Cut along the marked line with steady strokes.",
                &["hand saw", "clamp"],
                "done cutting",
            ),
        ]
    }

    #[test]
    fn step_command_matches_by_name_or_generic_phrase() {
        let step = &steps()[0];
        assert_eq!(
            match_step_command("I am done measuring now", step),
            Some(StepAction::CompleteStep)
        );
        assert_eq!(
            match_step_command("Measure the board", step),
            Some(StepAction::CompleteStep)
        );
        assert_eq!(
            match_step_command("next step please", step),
            Some(StepAction::CompleteStep)
        );
    }

    #[test]
    fn queries_take_priority_over_completion() {
        let step = &steps()[0];
        assert_eq!(
            match_step_command("what tools do I need for this step", step),
            Some(StepAction::QueryTools)
        );
        assert_eq!(
            match_step_command("explain the next step", step),
            Some(StepAction::QueryDetails)
        );
    }

    #[test]
    fn unknown_command_matches_nothing() {
        assert_eq!(match_step_command("sing a song", &steps()[0]), None);
    }

    #[test]
    fn completion_is_append_only_and_ordered() {
        let mut trainer = StepTrainer::new(steps(), false);
        trainer.begin();

        trainer.on_transcript("done measuring").unwrap();
        assert_eq!(trainer.advance(), GamePhase::Listening);
        assert_eq!(trainer.completed_steps(), ["measure the board"]);

        trainer.on_transcript("done cutting").unwrap();
        assert_eq!(trainer.advance(), GamePhase::Complete);
        assert_eq!(
            trainer.completed_steps(),
            ["measure the board", "cut the board"]
        );
        assert!(trainer.is_finished());
    }

    #[test]
    fn queries_do_not_advance_the_step() {
        let mut trainer = StepTrainer::new(steps(), false);
        trainer.begin();

        let fb = trainer.on_transcript("what tools do I need").unwrap();
        assert_eq!(fb.kind, FeedbackKind::Info);
        assert!(fb.message.contains("tape measure"));
        assert_eq!(trainer.advance(), GamePhase::Listening);
        assert!(trainer.completed_steps().is_empty());
        assert_eq!(trainer.current_step().unwrap().name, "measure the board");
    }

    #[test]
    fn advisory_set_only_when_enabled() {
        let mut silent = StepTrainer::new(steps(), false);
        silent.begin();
        assert!(silent.on_transcript("gibberish").is_none());
        assert!(silent.advisory().is_none());

        let mut advising = StepTrainer::new(steps(), true);
        advising.begin();
        assert!(advising.on_transcript("gibberish").is_none());
        let advisory = advising.advisory().unwrap();
        assert!(advisory.contains("gibberish"));
        // still listening; advisory is non-fatal
        assert_eq!(advising.phase(), GamePhase::Listening);
    }

    #[test]
    fn advisory_cleared_on_next_match() {
        let mut trainer = StepTrainer::new(steps(), true);
        trainer.begin();
        trainer.on_transcript("mumble");
        assert!(trainer.advisory().is_some());
        trainer.on_transcript("next step").unwrap();
        assert!(trainer.advisory().is_none());
    }

    #[test]
    fn restart_clears_completed_list() {
        let mut trainer = StepTrainer::new(steps(), false);
        trainer.begin();
        trainer.on_transcript("next step").unwrap();
        trainer.advance();
        trainer.on_transcript("next step").unwrap();
        trainer.advance();
        assert!(trainer.is_finished());

        assert!(trainer.restart());
        assert!(trainer.completed_steps().is_empty());
        assert!(!trainer.is_finished());
    }
}
