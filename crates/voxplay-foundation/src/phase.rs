use crate::error::VoxPlayError;
use crossbeam_channel::{Receiver, Sender};
use parking_lot::RwLock;
use std::sync::Arc;

/// Lifecycle of a single game screen. Every game drives the same phase
/// machine; game-specific state (score, step index) lives in the game itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GamePhase {
    Idle,
    Listening,
    Evaluating,
    Feedback,
    Complete,
}

pub struct PhaseTracker {
    phase: Arc<RwLock<GamePhase>>,
    /// Live subscriber channels; closed ones are pruned on the next send,
    /// and with no subscribers nothing is buffered.
    subscribers: RwLock<Vec<Sender<GamePhase>>>,
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self {
            phase: Arc::new(RwLock::new(GamePhase::Idle)),
            subscribers: RwLock::new(Vec::new()),
        }
    }

    pub fn transition(&self, next: GamePhase) -> Result<(), VoxPlayError> {
        let mut current = self.phase.write();

        // Validate phase transitions
        let valid = matches!(
            (&*current, &next),
            (GamePhase::Idle, GamePhase::Listening)
                | (GamePhase::Listening, GamePhase::Evaluating)
                | (GamePhase::Listening, GamePhase::Idle)
                | (GamePhase::Evaluating, GamePhase::Feedback)
                | (GamePhase::Feedback, GamePhase::Listening)
                | (GamePhase::Feedback, GamePhase::Complete)
                | (GamePhase::Complete, GamePhase::Idle)
        );

        if !valid {
            return Err(VoxPlayError::Fatal(format!(
                "Invalid phase transition: {:?} -> {:?}",
                *current, next
            )));
        }

        tracing::info!("Phase transition: {:?} -> {:?}", *current, next);
        *current = next.clone();
        self.subscribers
            .write()
            .retain(|tx| tx.send(next.clone()).is_ok());
        Ok(())
    }

    pub fn current(&self) -> GamePhase {
        self.phase.read().clone()
    }

    /// Subscribe to phase changes. Only transitions made after the call are
    /// delivered.
    pub fn subscribe(&self) -> Receiver<GamePhase> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.subscribers.write().push(tx);
        rx
    }
}
