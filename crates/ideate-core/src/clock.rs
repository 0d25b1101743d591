//! Strictly monotonic timestamp source.
//!
//! Wall clocks can repeat or step backwards. Every timestamp issued here is
//! at least one microsecond after the previous one, so `updated_date` always
//! moves forward on mutation even when two writes land in the same tick.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};

#[derive(Debug, Default)]
pub struct MonotonicClock {
    last_micros: Mutex<i64>,
}

impl MonotonicClock {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_micros: Mutex::new(0),
        }
    }

    /// Next timestamp: `max(wall clock, last issued + 1µs)`.
    pub fn now(&self) -> DateTime<Utc> {
        let mut last = self
            .last_micros
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let wall = Utc::now().timestamp_micros();
        let next = wall.max(*last + 1);
        *last = next;
        DateTime::from_timestamp_micros(next).unwrap_or_else(Utc::now)
    }

    /// Make sure the next timestamp is later than `seen`.
    ///
    /// Used when a store reopens with records written by an earlier process.
    pub fn observe(&self, seen: &DateTime<Utc>) {
        let mut last = self
            .last_micros
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *last = (*last).max(seen.timestamp_micros());
    }
}
