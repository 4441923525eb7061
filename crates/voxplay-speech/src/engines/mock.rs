//! Mock recognizer for testing the session layer and the games

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::info;

use voxplay_foundation::error::VoiceError;

use crate::types::{RecognitionConfig, RecognitionEvent};
use crate::SpeechRecognizer;

/// Configuration for mock recognition behavior
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Events emitted, in order, after each successful `start`
    pub script: Vec<RecognitionEvent>,

    /// Delay between scripted events in ms
    pub emit_delay_ms: u64,

    /// Fail `start` with this error instead of capturing
    pub fail_start_with: Option<VoiceError>,

    /// Report the capability as absent
    pub unavailable: bool,
}

/// Operations observed by the mock, for asserting the stop-before-start
/// discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockOp {
    Start,
    Stop,
}

/// Scripted recognizer for tests. Events are pushed on the channel given at
/// construction; a `MockHandle` lets tests emit extra events mid-session and
/// inspect the operation log.
pub struct MockRecognizer {
    config: MockConfig,
    events: mpsc::Sender<RecognitionEvent>,
    active: Arc<AtomicBool>,
    ops: Arc<Mutex<Vec<MockOp>>>,
}

impl MockRecognizer {
    pub fn new(config: MockConfig, events: mpsc::Sender<RecognitionEvent>) -> Self {
        Self {
            config,
            events,
            active: Arc::new(AtomicBool::new(false)),
            ops: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_script(script: Vec<RecognitionEvent>, events: mpsc::Sender<RecognitionEvent>) -> Self {
        Self::new(
            MockConfig {
                script,
                ..Default::default()
            },
            events,
        )
    }

    pub fn handle(&self) -> MockHandle {
        MockHandle {
            events: self.events.clone(),
            active: Arc::clone(&self.active),
            ops: Arc::clone(&self.ops),
        }
    }
}

#[async_trait]
impl SpeechRecognizer for MockRecognizer {
    async fn start(&mut self, _config: &RecognitionConfig) -> Result<(), VoiceError> {
        self.ops.lock().unwrap().push(MockOp::Start);
        if let Some(err) = &self.config.fail_start_with {
            return Err(err.clone());
        }
        self.active.store(true, Ordering::SeqCst);
        info!("MockRecognizer started, {} scripted events", self.config.script.len());

        let script = self.config.script.clone();
        let delay = self.config.emit_delay_ms;
        let events = self.events.clone();
        let active = Arc::clone(&self.active);
        tokio::spawn(async move {
            for event in script {
                if delay > 0 {
                    tokio::time::sleep(tokio::time::Duration::from_millis(delay)).await;
                }
                if !active.load(Ordering::SeqCst) {
                    break;
                }
                if events.send(event).await.is_err() {
                    break;
                }
            }
        });
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), VoiceError> {
        self.ops.lock().unwrap().push(MockOp::Stop);
        self.active.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_available(&self) -> bool {
        !self.config.unavailable
    }
}

/// Test-side handle to a `MockRecognizer`.
#[derive(Clone)]
pub struct MockHandle {
    events: mpsc::Sender<RecognitionEvent>,
    active: Arc<AtomicBool>,
    ops: Arc<Mutex<Vec<MockOp>>>,
}

impl MockHandle {
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    pub fn ops(&self) -> Vec<MockOp> {
        self.ops.lock().unwrap().clone()
    }

    pub fn start_count(&self) -> usize {
        self.ops().iter().filter(|op| **op == MockOp::Start).count()
    }

    /// Emit an event as if the platform produced it.
    pub async fn emit(&self, event: RecognitionEvent) {
        let _ = self.events.send(event).await;
    }
}
