//! Test clocks: deterministic `Clock` implementations for tests.

use std::sync::Mutex;

use casefile_core::clock::Clock;
use chrono::{DateTime, Duration, TimeZone, Utc};

/// The instant every test clock starts from unless told otherwise.
///
/// # Panics
///
/// Never; the date is a valid constant.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
}

/// A clock that always returns a fixed point in time.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// A clock that advances by a fixed step every time it is read, so each
/// timestamp a test observes is distinct and ordered.
#[derive(Debug)]
pub struct SteppingClock {
    next: Mutex<DateTime<Utc>>,
    step: Duration,
}

impl SteppingClock {
    /// Creates a clock whose first reading is `start`.
    #[must_use]
    pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            next: Mutex::new(start),
            step,
        }
    }

    /// Returns what the next reading will be, without advancing.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn peek(&self) -> DateTime<Utc> {
        *self.next.lock().unwrap()
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let mut next = self.next.lock().unwrap();
        let current = *next;
        *next = current + self.step;
        current
    }
}
