//! Game runtime: wires the voice session to the active game
//!
//! One `GameRuntime` drives one mounted game: transcripts flow from the
//! session manager to the game's matcher; a matched action freezes the
//! session, renders feedback for the game's dwell time, then either resumes
//! listening on the next item or finishes. Teardown always stops the
//! session so no recognition callback outlives the game.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use voxplay_foundation::clock::SharedClock;
use voxplay_foundation::error::RecoveryStrategy;
use voxplay_foundation::phase::GamePhase;
use voxplay_foundation::shutdown::ShutdownGuard;
use voxplay_games::carpentry;
use voxplay_games::coding::CodingSession;
use voxplay_games::feedback::Feedback;
use voxplay_games::first_aid;
use voxplay_games::quiz::{MatchMode, QuizSession};
use voxplay_games::rhythm::{sample_rounds, RhythmSession};
use voxplay_games::steps::StepTrainer;
use voxplay_games::story::StorySession;
use voxplay_games::{catalog, quiz};
use voxplay_speech::VoiceSessionManager;
use voxplay_tts::{SpeechSynthesizer, SynthesisOptions};

/// The shape every game session presents to the runtime.
pub trait VoiceGame: Send {
    fn begin(&mut self) -> bool;

    /// What to show (and speak) when listening starts for the current item.
    fn prompt(&self) -> Option<String>;

    fn on_transcript(&mut self, transcript: &str) -> Option<Feedback>;

    fn advance(&mut self) -> GamePhase;

    /// Non-fatal notice about the last unmatched command, if the game
    /// produces one.
    fn advisory(&self) -> Option<String> {
        None
    }

    fn summary(&self) -> String;
}

impl VoiceGame for QuizSession {
    fn begin(&mut self) -> bool {
        QuizSession::begin(self)
    }

    fn prompt(&self) -> Option<String> {
        self.current_question().map(|q| {
            format!(
                "{}\n  Options: {}",
                q.prompt(),
                q.options().join(", ")
            )
        })
    }

    fn on_transcript(&mut self, transcript: &str) -> Option<Feedback> {
        QuizSession::on_transcript(self, transcript)
    }

    fn advance(&mut self) -> GamePhase {
        QuizSession::advance(self)
    }

    fn summary(&self) -> String {
        format!("You scored {} out of {}.", self.score(), self.question_count())
    }
}

impl VoiceGame for StepTrainer {
    fn begin(&mut self) -> bool {
        StepTrainer::begin(self)
    }

    fn prompt(&self) -> Option<String> {
        self.current_step().map(|s| {
            format!(
                "Step {} of {}: {}",
                self.completed_steps().len() + 1,
                self.step_count(),
                s.name
            )
        })
    }

    fn on_transcript(&mut self, transcript: &str) -> Option<Feedback> {
        StepTrainer::on_transcript(self, transcript)
    }

    fn advance(&mut self) -> GamePhase {
        StepTrainer::advance(self)
    }

    fn advisory(&self) -> Option<String> {
        StepTrainer::advisory(self).map(str::to_string)
    }

    fn summary(&self) -> String {
        format!(
            "Completed {} of {} steps.",
            self.completed_steps().len(),
            self.step_count()
        )
    }
}

impl VoiceGame for CodingSession {
    fn begin(&mut self) -> bool {
        CodingSession::begin(self)
    }

    fn prompt(&self) -> Option<String> {
        None
    }

    fn on_transcript(&mut self, transcript: &str) -> Option<Feedback> {
        CodingSession::on_transcript(self, transcript)
    }

    fn advance(&mut self) -> GamePhase {
        CodingSession::advance(self)
    }

    fn summary(&self) -> String {
        if self.output().is_empty() {
            "No program output.".to_string()
        } else {
            format!("Last output:\n{}", self.output())
        }
    }
}

impl VoiceGame for StorySession {
    fn begin(&mut self) -> bool {
        StorySession::begin(self)
    }

    fn prompt(&self) -> Option<String> {
        if self.sentences().is_empty() {
            Some("Start your story with a sentence.".to_string())
        } else {
            Some("And then?".to_string())
        }
    }

    fn on_transcript(&mut self, transcript: &str) -> Option<Feedback> {
        StorySession::on_transcript(self, transcript)
    }

    fn advance(&mut self) -> GamePhase {
        StorySession::advance(self)
    }

    fn summary(&self) -> String {
        self.story_text()
    }
}

impl VoiceGame for RhythmSession {
    fn begin(&mut self) -> bool {
        RhythmSession::begin(self)
    }

    fn prompt(&self) -> Option<String> {
        self.current_target()
            .map(|t| format!("Sing this back: {}", t.join(" ")))
    }

    fn on_transcript(&mut self, transcript: &str) -> Option<Feedback> {
        RhythmSession::on_transcript(self, transcript)
    }

    fn advance(&mut self) -> GamePhase {
        RhythmSession::advance(self)
    }

    fn summary(&self) -> String {
        format!("Rounds passed: {}.", self.rounds_passed())
    }
}

/// Construct the game a catalog id refers to.
pub fn mount(id: &str, shuffle: bool) -> Option<Box<dyn VoiceGame>> {
    catalog::find(id)?;
    let game: Box<dyn VoiceGame> = match id {
        "quiz" => {
            let questions = quiz::sample_questions();
            let session = if shuffle {
                let mut rng = StdRng::from_entropy();
                QuizSession::shuffled(questions, MatchMode::Exact, &mut rng)
            } else {
                QuizSession::new(questions, MatchMode::Exact)
            };
            Box::new(session)
        }
        "coding" => Box::new(CodingSession::with_toy_evaluator()),
        "carpentry" => Box::new(carpentry::trainer()),
        "first-aid" => Box::new(first_aid::trainer()),
        "story" => Box::new(StorySession::new()),
        "rhythm" => Box::new(RhythmSession::new(sample_rounds())),
        _ => return None,
    };
    Some(game)
}

pub struct RuntimeOptions {
    /// Speak prompts and feedback through the synthesizer
    pub speak: bool,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self { speak: true }
    }
}

pub struct GameRuntime {
    session: VoiceSessionManager,
    tts: Box<dyn SpeechSynthesizer>,
    clock: SharedClock,
    options: RuntimeOptions,
}

impl GameRuntime {
    pub fn new(
        session: VoiceSessionManager,
        tts: Box<dyn SpeechSynthesizer>,
        clock: SharedClock,
        options: RuntimeOptions,
    ) -> Self {
        Self {
            session,
            tts,
            clock,
            options,
        }
    }

    async fn speak(&mut self, text: &str) {
        if !self.options.speak {
            return;
        }
        if let Err(e) = self.tts.speak(text, Some(SynthesisOptions::default())).await {
            warn!("TTS failed: {}", e);
        }
    }

    async fn show_prompt(&mut self, game: &dyn VoiceGame) {
        if let Some(prompt) = game.prompt() {
            println!("\n{}", prompt);
            self.speak(&prompt).await;
        }
    }

    /// Try to (re)start listening, following the error's recovery strategy:
    /// retryable errors back off and try again, network errors wait for the
    /// connectivity signal. Returns `false` only when the game should end
    /// instead (capability absent, or shutdown requested while recovering).
    async fn resume_listening(&mut self, shutdown: &ShutdownGuard) -> bool {
        loop {
            if shutdown.is_shutdown_requested() {
                return false;
            }
            let err = match self.session.start_listening().await {
                Ok(()) => return true,
                Err(e) => e,
            };
            println!("! {}", err.user_message());
            match err.recovery_strategy() {
                RecoveryStrategy::Disable => {
                    warn!("Voice capability unavailable: {}", err);
                    return false;
                }
                RecoveryStrategy::Retry { delay } => {
                    debug!("Retrying listen after {:?}: {}", delay, err);
                    tokio::select! {
                        _ = shutdown.wait() => return false,
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
                RecoveryStrategy::WaitForNetwork => {
                    let mut connectivity = self.session.connectivity();
                    loop {
                        if *connectivity.borrow_and_update() {
                            break;
                        }
                        tokio::select! {
                            _ = shutdown.wait() => return false,
                            changed = connectivity.changed() => {
                                if changed.is_err() {
                                    return false;
                                }
                            }
                        }
                    }
                    info!("Network back; resuming listening");
                }
            }
        }
    }

    /// Drive one game to completion (or shutdown). Session errors are
    /// recoverable and never abort the game; the summary is always produced.
    pub async fn run_game(&mut self, game: &mut dyn VoiceGame, shutdown: &ShutdownGuard) -> String {
        let started_at = self.clock.now();
        let mut updates = self.session.transcript_updates();

        game.begin();
        if self.resume_listening(shutdown).await {
            self.show_prompt(&*game).await;
            self.play_rounds(game, shutdown, &mut updates).await;
        }

        self.session.stop_listening().await;
        let elapsed = self.clock.now().duration_since(started_at);
        format!("{} (finished in {})", game.summary(), humanize(elapsed))
    }

    async fn play_rounds(
        &mut self,
        game: &mut dyn VoiceGame,
        shutdown: &ShutdownGuard,
        updates: &mut tokio::sync::watch::Receiver<voxplay_speech::TranscriptUpdate>,
    ) {
        loop {
            tokio::select! {
                _ = shutdown.wait() => {
                    info!("Shutdown requested; leaving game");
                    return;
                }
                changed = updates.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    let update = updates.borrow_and_update().clone();
                    if update.text.is_empty() {
                        continue;
                    }

                    let Some(feedback) = game.on_transcript(&update.text) else {
                        if let Some(advisory) = game.advisory() {
                            println!("  ({})", advisory);
                        } else {
                            debug!("Unmatched transcript: {}", update.text);
                        }
                        // Stays in Listening; no timeout on unmatched input.
                        continue;
                    };

                    // Freeze further transcript updates before evaluating.
                    self.session.stop_listening().await;

                    println!("» {}", feedback.message);
                    if let Some(spoken) = &feedback.spoken {
                        self.speak(spoken).await;
                    }
                    tokio::time::sleep(feedback.dwell).await;

                    match game.advance() {
                        GamePhase::Complete => return,
                        GamePhase::Listening => {
                            if !self.resume_listening(shutdown).await {
                                return;
                            }
                            self.show_prompt(&*game).await;
                        }
                        phase => {
                            debug!("Game paused in phase {:?}", phase);
                        }
                    }
                }
            }
        }
    }

    pub fn session(&self) -> &VoiceSessionManager {
        &self.session
    }
}

fn humanize(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}s", secs)
    }
}
