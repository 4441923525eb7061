//! Terminal stand-in for the platform speech capability
//!
//! Each line typed on stdin is delivered as a final recognition result with
//! full confidence. One long-lived reader task is created up front; `start`
//! and `stop` only gate whether lines are forwarded, mirroring how the real
//! capability reuses a single recognition handle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use voxplay_foundation::error::VoiceError;
use voxplay_speech::{next_utterance_id, RecognitionConfig, RecognitionEvent, SpeechRecognizer};

pub struct LineRecognizer {
    active: Arc<AtomicBool>,
    reader: Option<JoinHandle<()>>,
}

impl LineRecognizer {
    pub fn new(events: mpsc::Sender<RecognitionEvent>) -> Self {
        let active = Arc::new(AtomicBool::new(false));
        let gate = Arc::clone(&active);

        let reader = tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if !gate.load(Ordering::SeqCst) {
                            debug!("Dropping input while not listening: {}", line);
                            continue;
                        }
                        let event = RecognitionEvent::Final {
                            utterance_id: next_utterance_id(),
                            text: line,
                            confidence: 1.0,
                        };
                        if events.send(event).await.is_err() {
                            break;
                        }
                    }
                    Ok(None) => {
                        let _ = events.send(RecognitionEvent::Ended).await;
                        break;
                    }
                    Err(e) => {
                        let _ = events
                            .send(RecognitionEvent::Error(VoiceError::Unknown {
                                code: e.to_string(),
                            }))
                            .await;
                        break;
                    }
                }
            }
        });

        Self {
            active,
            reader: Some(reader),
        }
    }
}

#[async_trait]
impl SpeechRecognizer for LineRecognizer {
    async fn start(&mut self, _config: &RecognitionConfig) -> Result<(), VoiceError> {
        self.active.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), VoiceError> {
        self.active.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_available(&self) -> bool {
        true
    }
}

impl Drop for LineRecognizer {
    fn drop(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
    }
}
