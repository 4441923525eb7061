//! Voice session manager
//!
//! Owns the listening/not-listening state machine on top of a
//! `SpeechRecognizer` handle. Recognition events arrive over a channel and
//! are folded into a `VoiceSnapshot`; the latest transcript is published on
//! a watch channel for the active game's command matcher.
//!
//! Discipline: at most one recognition handle is active at a time.
//! `start_listening` always supersedes any previous handle (stop before
//! start); rapid start/stop calls collapse to the latest intent.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use voxplay_foundation::error::VoiceError;

use crate::metrics::SessionMetrics;
use crate::types::{RecognitionConfig, RecognitionEvent, TranscriptUpdate, VoiceSnapshot};
use crate::SpeechRecognizer;

pub struct VoiceSessionManager {
    recognizer: Arc<Mutex<Box<dyn SpeechRecognizer>>>,
    config: RecognitionConfig,
    snapshot: Arc<RwLock<VoiceSnapshot>>,
    metrics: Arc<RwLock<SessionMetrics>>,
    transcript_tx: Arc<watch::Sender<TranscriptUpdate>>,
    connectivity: watch::Receiver<bool>,
    supported: bool,
    seq: Arc<AtomicU64>,
    pump: Option<JoinHandle<()>>,
}

impl VoiceSessionManager {
    /// Create a session manager over a recognizer handle.
    ///
    /// `event_rx` is the stream the recognizer delivers events on;
    /// `connectivity` is the online/offline signal. If the recognizer
    /// reports the capability as absent, the session is created in a
    /// disabled state with `error = Unsupported` (surfaced once, here).
    pub fn new(
        recognizer: Box<dyn SpeechRecognizer>,
        event_rx: mpsc::Receiver<RecognitionEvent>,
        connectivity: watch::Receiver<bool>,
        config: RecognitionConfig,
    ) -> Self {
        let supported = recognizer.is_available();
        let snapshot = Arc::new(RwLock::new(VoiceSnapshot::default()));
        if !supported {
            warn!("Speech recognition capability absent; voice session disabled");
            snapshot.write().error = Some(VoiceError::Unsupported);
        }

        let (transcript_tx, _) = watch::channel(TranscriptUpdate::default());
        let transcript_tx = Arc::new(transcript_tx);
        let metrics = Arc::new(RwLock::new(SessionMetrics::default()));
        let recognizer = Arc::new(Mutex::new(recognizer));
        let seq = Arc::new(AtomicU64::new(0));

        let pump = tokio::spawn(Self::pump(
            event_rx,
            connectivity.clone(),
            Arc::clone(&recognizer),
            Arc::clone(&snapshot),
            Arc::clone(&metrics),
            Arc::clone(&transcript_tx),
            Arc::clone(&seq),
        ));

        Self {
            recognizer,
            config,
            snapshot,
            metrics,
            transcript_tx,
            connectivity,
            supported,
            seq,
            pump: Some(pump),
        }
    }

    /// Event loop: folds recognition events into the snapshot and reacts to
    /// connectivity loss. Runs until the event channel closes.
    async fn pump(
        mut event_rx: mpsc::Receiver<RecognitionEvent>,
        mut connectivity: watch::Receiver<bool>,
        recognizer: Arc<Mutex<Box<dyn SpeechRecognizer>>>,
        snapshot: Arc<RwLock<VoiceSnapshot>>,
        metrics: Arc<RwLock<SessionMetrics>>,
        transcript_tx: Arc<watch::Sender<TranscriptUpdate>>,
        seq: Arc<AtomicU64>,
    ) {
        loop {
            tokio::select! {
                event = event_rx.recv() => {
                    let Some(event) = event else {
                        debug!("Recognition event channel closed; session pump exiting");
                        break;
                    };
                    Self::handle_event(event, &snapshot, &metrics, &transcript_tx, &seq);
                }
                changed = connectivity.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let online = *connectivity.borrow();
                    if online {
                        continue;
                    }
                    let was_listening = {
                        let mut snap = snapshot.write();
                        let was = snap.listening;
                        if was {
                            snap.listening = false;
                            snap.error = Some(VoiceError::Network);
                        }
                        was
                    };
                    if was_listening {
                        warn!("Network lost while listening; forcing session stop");
                        metrics.write().forced_stops += 1;
                        if let Err(e) = recognizer.lock().await.stop().await {
                            debug!("Recognizer stop after network loss failed: {}", e);
                        }
                    }
                }
            }
        }
    }

    fn handle_event(
        event: RecognitionEvent,
        snapshot: &RwLock<VoiceSnapshot>,
        metrics: &RwLock<SessionMetrics>,
        transcript_tx: &watch::Sender<TranscriptUpdate>,
        seq: &AtomicU64,
    ) {
        metrics.write().last_event_time = Some(Instant::now());
        match event {
            RecognitionEvent::Partial {
                text, confidence, ..
            } => {
                Self::apply_hypothesis(text, confidence, false, snapshot, metrics, transcript_tx, seq);
            }
            RecognitionEvent::Final {
                text, confidence, ..
            } => {
                Self::apply_hypothesis(text, confidence, true, snapshot, metrics, transcript_tx, seq);
            }
            RecognitionEvent::Error(err) => {
                warn!("Recognition error: {}", err);
                let mut snap = snapshot.write();
                snap.listening = false;
                snap.error = Some(err);
                metrics.write().error_count += 1;
            }
            RecognitionEvent::Ended => {
                debug!("Recognition handle ended");
                snapshot.write().listening = false;
            }
        }
    }

    fn apply_hypothesis(
        text: String,
        confidence: f32,
        is_final: bool,
        snapshot: &RwLock<VoiceSnapshot>,
        metrics: &RwLock<SessionMetrics>,
        transcript_tx: &watch::Sender<TranscriptUpdate>,
        seq: &AtomicU64,
    ) {
        let update = {
            let mut snap = snapshot.write();
            if !snap.listening {
                // Stale result after stop; the match already happened.
                metrics.write().stale_events += 1;
                return;
            }
            // Replace, never append: only the latest hypothesis is visible.
            snap.transcript = text.clone();
            snap.confidence = confidence;
            TranscriptUpdate {
                seq: seq.fetch_add(1, Ordering::SeqCst) + 1,
                text,
                confidence,
            }
        };
        {
            let mut m = metrics.write();
            if is_final {
                m.final_count += 1;
            } else {
                m.partial_count += 1;
            }
        }
        let _ = transcript_tx.send(update);
    }

    /// Start (or restart) listening.
    ///
    /// Preconditions: the capability must exist and the network must be
    /// online. Any prior handle is force-stopped first so exactly one is
    /// ever active. On success the transcript and error are reset and
    /// `listening` flips to true.
    pub async fn start_listening(&self) -> Result<(), VoiceError> {
        if !self.supported {
            return Err(VoiceError::Unsupported);
        }
        if !*self.connectivity.borrow() {
            self.snapshot.write().error = Some(VoiceError::Network);
            return Err(VoiceError::Network);
        }

        let mut recognizer = self.recognizer.lock().await;
        if let Err(e) = recognizer.stop().await {
            debug!("Superseding stop failed (ignored): {}", e);
        }

        {
            let mut snap = self.snapshot.write();
            snap.transcript.clear();
            snap.confidence = 0.0;
            snap.error = None;
            snap.listening = true;
        }

        match recognizer.start(&self.config).await {
            Ok(()) => {
                self.metrics.write().session_starts += 1;
                info!("Voice session listening");
                Ok(())
            }
            Err(e) => {
                let mut snap = self.snapshot.write();
                snap.listening = false;
                snap.error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Stop listening. `listening` flips to false immediately, before the
    /// platform confirms the stop; callers may treat this as synchronous.
    /// No-op when not listening.
    pub async fn stop_listening(&self) {
        let was_listening = {
            let mut snap = self.snapshot.write();
            let was = snap.listening;
            snap.listening = false;
            was
        };
        if let Err(e) = self.recognizer.lock().await.stop().await {
            warn!("Recognizer stop failed: {}", e);
        }
        if was_listening {
            info!("Voice session stopped");
        }
    }

    pub fn clear_transcript(&self) {
        let mut snap = self.snapshot.write();
        snap.transcript.clear();
        snap.confidence = 0.0;
        let _ = self.transcript_tx.send(TranscriptUpdate {
            seq: self.seq.fetch_add(1, Ordering::SeqCst) + 1,
            text: String::new(),
            confidence: 0.0,
        });
    }

    pub fn snapshot(&self) -> VoiceSnapshot {
        self.snapshot.read().clone()
    }

    pub fn metrics(&self) -> SessionMetrics {
        self.metrics.read().clone()
    }

    /// Subscribe to transcript updates (latest-value semantics).
    pub fn transcript_updates(&self) -> watch::Receiver<TranscriptUpdate> {
        self.transcript_tx.subscribe()
    }

    /// Subscribe to the connectivity signal this session is gated on.
    pub fn connectivity(&self) -> watch::Receiver<bool> {
        self.connectivity.clone()
    }

    pub fn is_supported(&self) -> bool {
        self.supported
    }

    /// Tear down the background pump. Called on navigation away from the
    /// voice UI; dropping the manager does the same.
    pub fn shutdown(&mut self) {
        if let Some(pump) = self.pump.take() {
            pump.abort();
        }
    }
}

impl Drop for VoiceSessionManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}
