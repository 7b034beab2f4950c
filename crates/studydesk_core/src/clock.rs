//! Injectable time source.
//!
//! # Responsibility
//! - Supply "now" to stores, queries and services without ambient globals.
//! - Carry the local UTC offset used for calendar-day predicates.
//!
//! # Invariants
//! - `Clock::now()` returns an instant paired with the configured offset.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Offset, Utc};
use std::sync::{Mutex, PoisonError};

/// Source of the current reference instant.
pub trait Clock: Send + Sync {
    /// Current instant in the local offset.
    fn now(&self) -> DateTime<FixedOffset>;

    fn now_utc(&self) -> DateTime<Utc> {
        self.now().with_timezone(&Utc)
    }
}

/// Wall clock reporting in a fixed local offset.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn utc() -> Self {
        Self {
            offset: utc_offset(),
        }
    }

    pub fn with_offset(offset: FixedOffset) -> Self {
        Self { offset }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::utc()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }
}

/// Manually driven clock for tests and replays.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<FixedOffset>>,
}

impl FixedClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Creates a clock pinned to a UTC instant.
    pub fn at_utc(now: DateTime<Utc>) -> Self {
        Self::new(now.fixed_offset())
    }

    pub fn set(&self, now: DateTime<FixedOffset>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut guard = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *guard += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Builds an offset from minutes east of UTC.
///
/// Returns `None` outside the ±24h range accepted by chrono.
pub fn offset_from_minutes(minutes: i32) -> Option<FixedOffset> {
    FixedOffset::east_opt(minutes.checked_mul(60)?)
}

/// Calendar day of `instant` as seen from `offset`.
pub fn local_day(instant: DateTime<Utc>, offset: &FixedOffset) -> NaiveDate {
    instant.with_timezone(offset).date_naive()
}

fn utc_offset() -> FixedOffset {
    Utc.fix()
}

#[cfg(test)]
mod tests {
    use super::{local_day, offset_from_minutes, Clock, FixedClock};
    use chrono::{Duration, NaiveDate, TimeZone, Utc};

    #[test]
    fn local_day_respects_offset() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 1, 23, 30, 0).unwrap();
        let tokyo = offset_from_minutes(9 * 60).unwrap();
        let utc = offset_from_minutes(0).unwrap();
        assert_eq!(
            local_day(instant, &tokyo),
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()
        );
        assert_eq!(
            local_day(instant, &utc),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
    }

    #[test]
    fn fixed_clock_advances() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let clock = FixedClock::at_utc(start);
        clock.advance(Duration::hours(5));
        assert_eq!(clock.now_utc(), start + Duration::hours(5));
    }

    #[test]
    fn offset_from_minutes_rejects_out_of_range() {
        assert!(offset_from_minutes(25 * 60).is_none());
        assert!(offset_from_minutes(-14 * 60).is_some());
    }
}
