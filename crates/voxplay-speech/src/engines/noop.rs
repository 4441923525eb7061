//! Recognizer standing in for an environment without speech support

use async_trait::async_trait;

use voxplay_foundation::error::VoiceError;

use crate::types::RecognitionConfig;
use crate::SpeechRecognizer;

/// A recognizer for hosts with no speech capability. The session manager
/// sees `is_available() == false` and surfaces `Unsupported` once at init;
/// any attempt to start anyway fails with the same error.
#[derive(Debug, Clone, Default)]
pub struct UnsupportedRecognizer;

impl UnsupportedRecognizer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SpeechRecognizer for UnsupportedRecognizer {
    async fn start(&mut self, _config: &RecognitionConfig) -> Result<(), VoiceError> {
        Err(VoiceError::Unsupported)
    }

    async fn stop(&mut self) -> Result<(), VoiceError> {
        Ok(())
    }

    fn is_available(&self) -> bool {
        false
    }
}
