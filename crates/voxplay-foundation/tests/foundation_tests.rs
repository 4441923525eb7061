//! Foundation crate tests
//!
//! Tests cover:
//! - Clock abstraction (RealClock, TestClock)
//! - Error types (VoiceError taxonomy, StoreError, VoxPlayError)
//! - Game phase transitions

use std::time::{Duration, Instant};
use voxplay_foundation::clock::{real_clock, test_clock, Clock, RealClock, TestClock};
use voxplay_foundation::error::{RecoveryStrategy, StoreError, VoiceError, VoxPlayError};
use voxplay_foundation::phase::{GamePhase, PhaseTracker};

// ─── Clock Tests ────────────────────────────────────────────────────

#[test]
fn real_clock_now_returns_current_time() {
    let clock = RealClock::new();
    let before = Instant::now();
    let clock_time = clock.now();
    let after = Instant::now();
    assert!(clock_time >= before);
    assert!(clock_time <= after);
}

#[test]
fn real_clock_factory_function() {
    let clock = real_clock();
    let t = clock.now();
    assert!(t.elapsed() < Duration::from_secs(1));
}

#[test]
fn test_clock_advance() {
    let clock = TestClock::new();
    let t0 = clock.now();
    clock.advance(Duration::from_secs(5));
    let t1 = clock.now();
    assert_eq!(t1.duration_since(t0), Duration::from_secs(5));
}

#[test]
fn test_clock_sleep_advances_time() {
    let clock = test_clock();
    let t0 = clock.now();
    clock.sleep(Duration::from_millis(1500));
    let t1 = clock.now();
    assert_eq!(t1.duration_since(t0), Duration::from_millis(1500));
}

// ─── Error Type Tests ───────────────────────────────────────────────

#[test]
fn voice_error_from_known_platform_codes() {
    assert_eq!(
        VoiceError::from_platform_code("no-speech"),
        VoiceError::NoSpeech
    );
    assert_eq!(
        VoiceError::from_platform_code("aborted"),
        VoiceError::Aborted
    );
    assert_eq!(
        VoiceError::from_platform_code("audio-capture"),
        VoiceError::AudioCapture
    );
    assert_eq!(
        VoiceError::from_platform_code("network"),
        VoiceError::Network
    );
    assert_eq!(
        VoiceError::from_platform_code("not-allowed"),
        VoiceError::NotAllowed
    );
    assert_eq!(
        VoiceError::from_platform_code("service-not-allowed"),
        VoiceError::ServiceNotAllowed
    );
}

#[test]
fn voice_error_unknown_code_preserved() {
    let err = VoiceError::from_platform_code("bad-grammar");
    assert_eq!(
        err,
        VoiceError::Unknown {
            code: "bad-grammar".to_string()
        }
    );
    let msg = format!("{}", err);
    assert!(msg.contains("bad-grammar"));
}

#[test]
fn voice_error_unsupported_is_disabled() {
    assert!(matches!(
        VoiceError::Unsupported.recovery_strategy(),
        RecoveryStrategy::Disable
    ));
}

#[test]
fn voice_error_network_waits_for_connectivity() {
    assert!(matches!(
        VoiceError::Network.recovery_strategy(),
        RecoveryStrategy::WaitForNetwork
    ));
}

#[test]
fn voice_error_no_speech_is_retryable() {
    assert!(matches!(
        VoiceError::NoSpeech.recovery_strategy(),
        RecoveryStrategy::Retry { .. }
    ));
}

#[test]
fn voice_error_user_messages_nonempty() {
    for err in [
        VoiceError::Unsupported,
        VoiceError::NoSpeech,
        VoiceError::Aborted,
        VoiceError::AudioCapture,
        VoiceError::Network,
        VoiceError::NotAllowed,
        VoiceError::ServiceNotAllowed,
        VoiceError::Unknown {
            code: "x".to_string(),
        },
    ] {
        assert!(!err.user_message().is_empty());
    }
}

#[test]
fn store_error_duplicate_email_names_email() {
    let err = StoreError::DuplicateEmail {
        email: "dup@example.com".to_string(),
    };
    let msg = format!("{}", err);
    assert!(msg.contains("dup@example.com"));
}

#[test]
fn voxplay_error_from_voice_error() {
    let err: VoxPlayError = VoiceError::Network.into();
    assert!(matches!(err, VoxPlayError::Voice(_)));
}

#[test]
fn voxplay_error_from_store_error() {
    let err: VoxPlayError = StoreError::DuplicateEmail {
        email: "a@b.c".to_string(),
    }
    .into();
    assert!(matches!(err, VoxPlayError::Store(_)));
}

// ─── Phase Tracker Tests ────────────────────────────────────────────

#[test]
fn phase_starts_idle() {
    let tracker = PhaseTracker::new();
    assert_eq!(tracker.current(), GamePhase::Idle);
}

#[test]
fn phase_full_round_trip() {
    let tracker = PhaseTracker::new();
    tracker.transition(GamePhase::Listening).unwrap();
    tracker.transition(GamePhase::Evaluating).unwrap();
    tracker.transition(GamePhase::Feedback).unwrap();
    tracker.transition(GamePhase::Listening).unwrap();
    tracker.transition(GamePhase::Evaluating).unwrap();
    tracker.transition(GamePhase::Feedback).unwrap();
    tracker.transition(GamePhase::Complete).unwrap();
    assert_eq!(tracker.current(), GamePhase::Complete);
}

#[test]
fn phase_restart_only_exit_from_complete() {
    let tracker = PhaseTracker::new();
    tracker.transition(GamePhase::Listening).unwrap();
    tracker.transition(GamePhase::Evaluating).unwrap();
    tracker.transition(GamePhase::Feedback).unwrap();
    tracker.transition(GamePhase::Complete).unwrap();

    assert!(tracker.transition(GamePhase::Listening).is_err());
    assert!(tracker.transition(GamePhase::Feedback).is_err());
    tracker.transition(GamePhase::Idle).unwrap();
    assert_eq!(tracker.current(), GamePhase::Idle);
}

#[test]
fn phase_manual_stop_returns_to_idle() {
    let tracker = PhaseTracker::new();
    tracker.transition(GamePhase::Listening).unwrap();
    tracker.transition(GamePhase::Idle).unwrap();
    assert_eq!(tracker.current(), GamePhase::Idle);
}

#[test]
fn phase_invalid_transition_rejected() {
    let tracker = PhaseTracker::new();
    assert!(tracker.transition(GamePhase::Feedback).is_err());
    assert!(tracker.transition(GamePhase::Complete).is_err());
    // state unchanged after rejected transitions
    assert_eq!(tracker.current(), GamePhase::Idle);
}

#[test]
fn phase_subscribers_observe_transitions() {
    let tracker = PhaseTracker::new();
    let rx = tracker.subscribe();
    tracker.transition(GamePhase::Listening).unwrap();
    tracker.transition(GamePhase::Evaluating).unwrap();
    assert_eq!(rx.recv().unwrap(), GamePhase::Listening);
    assert_eq!(rx.recv().unwrap(), GamePhase::Evaluating);
}

#[test]
fn phase_transitions_before_subscribe_are_not_delivered() {
    let tracker = PhaseTracker::new();
    tracker.transition(GamePhase::Listening).unwrap();

    let rx = tracker.subscribe();
    tracker.transition(GamePhase::Evaluating).unwrap();
    assert_eq!(rx.recv().unwrap(), GamePhase::Evaluating);
    assert!(rx.try_recv().is_err());
}

#[test]
fn phase_dropped_subscriber_does_not_block_transitions() {
    let tracker = PhaseTracker::new();
    let rx = tracker.subscribe();
    drop(rx);
    tracker.transition(GamePhase::Listening).unwrap();
    tracker.transition(GamePhase::Evaluating).unwrap();
    assert_eq!(tracker.current(), GamePhase::Evaluating);
}
