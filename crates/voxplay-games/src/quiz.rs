//! Quiz game: spoken multiple-choice answers
//!
//! The matcher compares the transcript against the current question's four
//! options; the session advances one question per matched answer and keeps
//! a running score.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use voxplay_foundation::phase::{GamePhase, PhaseTracker};

use crate::feedback::{Feedback, FeedbackKind};
use crate::{advance_phase, normalize};

/// Feedback dwell before the next question appears
const DWELL: Duration = Duration::from_secs(2);

pub const OPTION_COUNT: usize = 4;

/// One immutable quiz question. `correct` is always one of `options`;
/// construction guarantees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    prompt: String,
    options: [String; OPTION_COUNT],
    correct_index: usize,
}

impl Question {
    pub fn new(
        prompt: impl Into<String>,
        options: [&str; OPTION_COUNT],
        correct_index: usize,
    ) -> Self {
        debug_assert!(correct_index < OPTION_COUNT);
        Self {
            prompt: prompt.into(),
            options: options.map(|o| o.to_string()),
            correct_index: correct_index % OPTION_COUNT,
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct_answer(&self) -> &str {
        &self.options[self.correct_index]
    }
}

/// How spoken text is compared against options. The strict quiz wants the
/// whole utterance to be the option; the generic variant accepts the option
/// anywhere inside the utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    Exact,
    Contains,
}

/// Outcome of matching a transcript against a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerMatch {
    Correct(String),
    /// A recognized option that is not the correct answer
    Incorrect(String),
}

/// Pure matcher: transcript + question -> recognized answer, if any.
/// The correct answer is tested first, so a transcript mentioning both a
/// wrong option and the correct one still scores.
pub fn match_answer(transcript: &str, question: &Question, mode: MatchMode) -> Option<AnswerMatch> {
    let spoken = normalize(transcript);
    if spoken.is_empty() {
        return None;
    }

    let matches_option = |option: &str| {
        let option = option.to_lowercase();
        match mode {
            MatchMode::Exact => spoken == option,
            MatchMode::Contains => spoken.contains(&option),
        }
    };

    if matches_option(question.correct_answer()) {
        return Some(AnswerMatch::Correct(question.correct_answer().to_string()));
    }
    let hit = question
        .options
        .iter()
        .find(|option| matches_option(option.as_str()))?;
    Some(AnswerMatch::Incorrect(hit.clone()))
}

/// In-place Fisher–Yates shuffle. Inputs of length <= 1 come back unchanged.
pub fn shuffle_questions<R: Rng>(questions: &mut [Question], rng: &mut R) {
    for i in (1..questions.len()).rev() {
        let j = rng.gen_range(0..=i);
        questions.swap(i, j);
    }
}

pub struct QuizSession {
    questions: Vec<Question>,
    current: usize,
    score: u32,
    completed: bool,
    mode: MatchMode,
    phase: PhaseTracker,
}

impl QuizSession {
    pub fn new(questions: Vec<Question>, mode: MatchMode) -> Self {
        Self {
            questions,
            current: 0,
            score: 0,
            completed: false,
            mode,
            phase: PhaseTracker::new(),
        }
    }

    /// Create a session with the question order shuffled once, up front.
    pub fn shuffled<R: Rng>(mut questions: Vec<Question>, mode: MatchMode, rng: &mut R) -> Self {
        shuffle_questions(&mut questions, rng);
        Self::new(questions, mode)
    }

    pub fn begin(&mut self) -> bool {
        advance_phase(&self.phase, GamePhase::Listening)
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    /// Feed the latest transcript. Returns feedback when an option was
    /// recognized; `None` leaves the session listening.
    pub fn on_transcript(&mut self, transcript: &str) -> Option<Feedback> {
        if self.phase.current() != GamePhase::Listening {
            return None;
        }
        let question = self.questions.get(self.current)?;
        let matched = match_answer(transcript, question, self.mode)?;

        if !advance_phase(&self.phase, GamePhase::Evaluating) {
            return None;
        }
        let feedback = match matched {
            AnswerMatch::Correct(answer) => {
                self.score += 1;
                Feedback::new(
                    FeedbackKind::Correct,
                    format!("Correct! The answer is {}.", answer),
                    DWELL,
                )
                .with_spoken("That's right!")
            }
            AnswerMatch::Incorrect(answer) => Feedback::new(
                FeedbackKind::Incorrect,
                format!(
                    "\"{}\" is not right. The answer was {}.",
                    answer,
                    question.correct_answer()
                ),
                DWELL,
            )
            .with_spoken("Not quite, let's try the next one."),
        };
        advance_phase(&self.phase, GamePhase::Feedback);
        Some(feedback)
    }

    /// Leave the feedback dwell: move to the next question, or complete.
    pub fn advance(&mut self) -> GamePhase {
        if self.phase.current() != GamePhase::Feedback {
            return self.phase.current();
        }
        if self.current + 1 < self.questions.len() {
            self.current += 1;
            advance_phase(&self.phase, GamePhase::Listening);
        } else {
            self.completed = true;
            advance_phase(&self.phase, GamePhase::Complete);
        }
        self.phase.current()
    }

    /// Restart from the summary screen: state reset, back to `Idle`.
    pub fn restart(&mut self) -> bool {
        if self.phase.current() != GamePhase::Complete {
            return false;
        }
        self.current = 0;
        self.score = 0;
        self.completed = false;
        advance_phase(&self.phase, GamePhase::Idle)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn phase(&self) -> GamePhase {
        self.phase.current()
    }
}

/// Built-in question bank for the quiz screen.
pub fn sample_questions() -> Vec<Question> {
    vec![
        Question::new(
            "What is the capital of France?",
            ["london", "paris", "berlin", "madrid"],
            1,
        ),
        Question::new(
            "How many legs does a spider have?",
            ["six", "eight", "ten", "four"],
            1,
        ),
        Question::new(
            "Which planet is known as the red planet?",
            ["venus", "jupiter", "mars", "saturn"],
            2,
        ),
        Question::new(
            "What do bees make?",
            ["milk", "silk", "honey", "bread"],
            2,
        ),
        Question::new(
            "Which animal is the largest on Earth?",
            ["elephant", "blue whale", "giraffe", "great white shark"],
            1,
        ),
    ]
}
