//! Voice session manager tests
//!
//! Covers the session lifecycle: stop-before-start discipline,
//! replace-not-append transcripts, connectivity-forced stops, stale event
//! discard, and the disabled (unsupported) path.

use std::time::Duration;

use tokio::sync::mpsc;
use voxplay_foundation::error::VoiceError;
use voxplay_speech::engines::{MockConfig, MockHandle, MockOp, MockRecognizer, UnsupportedRecognizer};
use voxplay_speech::{
    next_utterance_id, ConnectivityMonitor, RecognitionConfig, RecognitionEvent,
    VoiceSessionManager,
};

fn partial(text: &str, confidence: f32) -> RecognitionEvent {
    RecognitionEvent::Partial {
        utterance_id: next_utterance_id(),
        text: text.to_string(),
        confidence,
    }
}

fn final_result(text: &str, confidence: f32) -> RecognitionEvent {
    RecognitionEvent::Final {
        utterance_id: next_utterance_id(),
        text: text.to_string(),
        confidence,
    }
}

fn make_session(
    mock_config: MockConfig,
    initially_online: bool,
) -> (VoiceSessionManager, MockHandle, ConnectivityMonitor) {
    let (event_tx, event_rx) = mpsc::channel(64);
    let recognizer = MockRecognizer::new(mock_config, event_tx);
    let handle = recognizer.handle();
    let monitor = ConnectivityMonitor::new(initially_online);
    let session = VoiceSessionManager::new(
        Box::new(recognizer),
        event_rx,
        monitor.subscribe(),
        RecognitionConfig::default(),
    );
    (session, handle, monitor)
}

/// Poll until `pred` holds or the deadline passes.
async fn wait_until<F: Fn() -> bool>(pred: F) {
    let deadline = tokio::time::Instant::now() + Duration::from_millis(500);
    while !pred() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not reached in time"
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

#[tokio::test]
async fn start_listening_resets_and_flips_listening() {
    let (session, _handle, _monitor) = make_session(MockConfig::default(), true);

    session.start_listening().await.unwrap();
    let snap = session.snapshot();
    assert!(snap.listening);
    assert!(snap.transcript.is_empty());
    assert!(snap.error.is_none());
    assert_eq!(session.metrics().session_starts, 1);
}

#[tokio::test]
async fn restart_supersedes_previous_handle() {
    let (session, handle, _monitor) = make_session(MockConfig::default(), true);

    session.start_listening().await.unwrap();
    session.start_listening().await.unwrap();

    // Exactly one handle active; every start was preceded by a stop.
    assert!(handle.is_active());
    assert_eq!(handle.start_count(), 2);
    let ops = handle.ops();
    assert_eq!(
        ops,
        vec![MockOp::Stop, MockOp::Start, MockOp::Stop, MockOp::Start]
    );
}

#[tokio::test]
async fn network_loss_while_listening_forces_stop() {
    let (session, handle, monitor) = make_session(MockConfig::default(), true);

    session.start_listening().await.unwrap();
    assert!(session.snapshot().listening);

    monitor.set_online(false);
    wait_until(|| !session.snapshot().listening).await;

    let snap = session.snapshot();
    assert_eq!(snap.error, Some(VoiceError::Network));
    assert!(!handle.is_active());
    assert_eq!(session.metrics().forced_stops, 1);
}

#[tokio::test]
async fn start_while_offline_fails_without_listening() {
    let (session, handle, _monitor) = make_session(MockConfig::default(), false);

    let err = session.start_listening().await.unwrap_err();
    assert_eq!(err, VoiceError::Network);
    let snap = session.snapshot();
    assert!(!snap.listening);
    assert_eq!(snap.error, Some(VoiceError::Network));
    assert_eq!(handle.start_count(), 0);
}

#[tokio::test]
async fn results_replace_the_transcript() {
    let (session, handle, _monitor) = make_session(MockConfig::default(), true);
    session.start_listening().await.unwrap();

    handle.emit(partial("what is", 0.4)).await;
    handle.emit(partial("what is rust", 0.8)).await;
    wait_until(|| session.snapshot().transcript == "what is rust").await;

    let snap = session.snapshot();
    assert_eq!(snap.transcript, "what is rust");
    assert!((snap.confidence - 0.8).abs() < f32::EPSILON);
    assert_eq!(session.metrics().partial_count, 2);
}

#[tokio::test]
async fn scripted_events_flow_through_on_start() {
    let (session, _handle, _monitor) = make_session(
        MockConfig {
            script: vec![partial("paris", 0.3), final_result("paris", 0.95)],
            ..Default::default()
        },
        true,
    );
    session.start_listening().await.unwrap();

    wait_until(|| session.metrics().final_count == 1).await;
    assert_eq!(session.snapshot().transcript, "paris");
}

#[tokio::test]
async fn stale_results_after_stop_are_discarded() {
    let (session, handle, _monitor) = make_session(MockConfig::default(), true);
    session.start_listening().await.unwrap();

    handle.emit(final_result("first answer", 0.9)).await;
    wait_until(|| session.snapshot().transcript == "first answer").await;

    session.stop_listening().await;
    handle.emit(final_result("late answer", 0.9)).await;
    wait_until(|| session.metrics().stale_events == 1).await;

    // The frozen transcript is still the one that matched.
    assert_eq!(session.snapshot().transcript, "first answer");
}

#[tokio::test]
async fn recognition_error_stops_listening() {
    let (session, handle, _monitor) = make_session(MockConfig::default(), true);
    session.start_listening().await.unwrap();

    handle
        .emit(RecognitionEvent::Error(VoiceError::AudioCapture))
        .await;
    wait_until(|| !session.snapshot().listening).await;

    assert_eq!(session.snapshot().error, Some(VoiceError::AudioCapture));
    assert_eq!(session.metrics().error_count, 1);
}

#[tokio::test]
async fn stop_when_not_listening_is_a_no_op() {
    let (session, _handle, _monitor) = make_session(MockConfig::default(), true);
    session.stop_listening().await;
    assert!(!session.snapshot().listening);
}

#[tokio::test]
async fn unsupported_capability_disables_session() {
    let (_event_tx, event_rx) = mpsc::channel(4);
    let monitor = ConnectivityMonitor::new(true);
    let session = VoiceSessionManager::new(
        Box::new(UnsupportedRecognizer::new()),
        event_rx,
        monitor.subscribe(),
        RecognitionConfig::default(),
    );

    // Surfaced once at init, and again on any start attempt.
    assert!(!session.is_supported());
    assert_eq!(session.snapshot().error, Some(VoiceError::Unsupported));
    let err = session.start_listening().await.unwrap_err();
    assert_eq!(err, VoiceError::Unsupported);
}

#[tokio::test]
async fn failed_start_reports_error_and_stays_stopped() {
    let (session, _handle, _monitor) = make_session(
        MockConfig {
            fail_start_with: Some(VoiceError::NotAllowed),
            ..Default::default()
        },
        true,
    );

    let err = session.start_listening().await.unwrap_err();
    assert_eq!(err, VoiceError::NotAllowed);
    let snap = session.snapshot();
    assert!(!snap.listening);
    assert_eq!(snap.error, Some(VoiceError::NotAllowed));
}

#[tokio::test]
async fn clear_transcript_publishes_empty_update() {
    let (session, handle, _monitor) = make_session(MockConfig::default(), true);
    let mut updates = session.transcript_updates();
    session.start_listening().await.unwrap();

    handle.emit(partial("something", 0.5)).await;
    wait_until(|| !session.snapshot().transcript.is_empty()).await;

    session.clear_transcript();
    assert!(session.snapshot().transcript.is_empty());

    // Latest published update is the cleared one.
    let mut latest = String::from("something");
    while updates.has_changed().unwrap() {
        updates.changed().await.unwrap();
        latest = updates.borrow().text.clone();
    }
    assert!(latest.is_empty());
}
