//! Voice session counters

use std::time::Instant;

/// Counters for one voice session manager.
#[derive(Debug, Clone, Default)]
pub struct SessionMetrics {
    /// Number of partial hypotheses received
    pub partial_count: u64,
    /// Number of final hypotheses received
    pub final_count: u64,
    /// Number of recognition errors
    pub error_count: u64,
    /// Number of times a session was (re)started
    pub session_starts: u64,
    /// Stops forced by connectivity loss
    pub forced_stops: u64,
    /// Events discarded because the session was no longer listening
    pub stale_events: u64,
    /// Time of the most recent recognition event
    pub last_event_time: Option<Instant>,
}
