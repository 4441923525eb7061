//! Clock abstraction so feedback dwell times and countdowns are
//! deterministic under test.

use std::time::{Duration, Instant};

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;

    /// Sleep for the specified duration (virtual clocks just advance).
    fn sleep(&self, duration: Duration);
}

pub struct RealClock;

impl Default for RealClock {
    fn default() -> Self {
        Self::new()
    }
}

impl RealClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for RealClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Virtual clock for deterministic testing.
pub struct TestClock {
    current: std::sync::Mutex<Instant>,
}

impl Default for TestClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TestClock {
    pub fn new() -> Self {
        Self {
            current: std::sync::Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, duration: Duration) {
        let mut t = self.current.lock().unwrap();
        *t += duration;
    }
}

impl Clock for TestClock {
    fn now(&self) -> Instant {
        *self.current.lock().unwrap()
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
        std::thread::yield_now();
    }
}

pub type SharedClock = std::sync::Arc<dyn Clock + Send + Sync>;

pub fn real_clock() -> SharedClock {
    std::sync::Arc::new(RealClock::new())
}

pub fn test_clock() -> SharedClock {
    std::sync::Arc::new(TestClock::new())
}
