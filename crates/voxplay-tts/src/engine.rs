//! Synthesizer trait, synthesis events, and the console engine

use async_trait::async_trait;

use crate::error::{TtsError, TtsResult};
use crate::types::{SynthesisOptions, TtsConfig};

/// Synthesis event types
#[derive(Debug, Clone)]
pub enum SynthesisEvent {
    /// Synthesis started for the given text
    Started { synthesis_id: u64, text: String },
    /// Synthesis completed
    Completed { synthesis_id: u64 },
    /// Synthesis failed
    Failed { synthesis_id: u64, error: String },
    /// Synthesis was cancelled before completing
    Cancelled { synthesis_id: u64 },
}

/// Text-to-speech synthesis interface.
///
/// `speak` returns once the utterance has been handed to the engine; the
/// engine speaks asynchronously. `stop` cancels anything in flight. A
/// disabled config turns `speak` into a no-op that still succeeds, so game
/// code never branches on TTS availability.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Speak an utterance with optional per-utterance overrides.
    async fn speak(&mut self, text: &str, options: Option<SynthesisOptions>)
        -> TtsResult<SynthesisEvent>;

    /// Cancel in-flight speech.
    async fn stop(&mut self) -> TtsResult<()>;

    /// Check if the engine can speak in this environment.
    async fn is_ready(&self) -> bool;

    /// Get current configuration
    fn config(&self) -> &TtsConfig;
}

/// Synthesizer for the terminal front-end: "speaks" by printing the
/// utterance, so every spoken-feedback path is exercised without audio.
pub struct ConsoleSynthesizer {
    config: TtsConfig,
    spoken: Vec<String>,
}

impl ConsoleSynthesizer {
    pub fn new(config: TtsConfig) -> Self {
        Self {
            config,
            spoken: Vec::new(),
        }
    }

    /// Utterances spoken so far, oldest first.
    pub fn spoken(&self) -> &[String] {
        &self.spoken
    }
}

impl Default for ConsoleSynthesizer {
    fn default() -> Self {
        Self::new(TtsConfig::default())
    }
}

#[async_trait]
impl SpeechSynthesizer for ConsoleSynthesizer {
    async fn speak(
        &mut self,
        text: &str,
        options: Option<SynthesisOptions>,
    ) -> TtsResult<SynthesisEvent> {
        let synthesis_id = crate::next_synthesis_id();
        if !self.config.enabled {
            return Ok(SynthesisEvent::Cancelled { synthesis_id });
        }
        if text.trim().is_empty() {
            return Err(TtsError::InvalidInput("empty utterance".to_string()));
        }

        let options = options.unwrap_or_default();
        let rate = options.rate.unwrap_or(self.config.rate);
        let pitch = options.pitch.unwrap_or(self.config.pitch);
        tracing::info!(synthesis_id, rate, pitch, "Speaking: {}", text);
        println!("🔊 {}", text);
        self.spoken.push(text.to_string());

        Ok(SynthesisEvent::Completed { synthesis_id })
    }

    async fn stop(&mut self) -> TtsResult<()> {
        // Console output is instantaneous; nothing in flight to cancel.
        Ok(())
    }

    async fn is_ready(&self) -> bool {
        self.config.enabled
    }

    fn config(&self) -> &TtsConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn speak_records_utterance() {
        let mut tts = ConsoleSynthesizer::default();
        let event = tts.speak("Correct answer!", None).await.unwrap();
        assert!(matches!(event, SynthesisEvent::Completed { .. }));
        assert_eq!(tts.spoken(), ["Correct answer!"]);
    }

    #[tokio::test]
    async fn disabled_config_swallows_speech() {
        let mut tts = ConsoleSynthesizer::new(TtsConfig {
            enabled: false,
            ..Default::default()
        });
        let event = tts.speak("nope", None).await.unwrap();
        assert!(matches!(event, SynthesisEvent::Cancelled { .. }));
        assert!(tts.spoken().is_empty());
        assert!(!tts.is_ready().await);
    }

    #[tokio::test]
    async fn empty_utterance_rejected() {
        let mut tts = ConsoleSynthesizer::default();
        let err = tts.speak("   ", None).await.unwrap_err();
        assert!(matches!(err, TtsError::InvalidInput(_)));
    }
}
