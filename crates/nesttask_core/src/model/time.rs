//! Timestamp value types and clock abstraction.
//!
//! # Responsibility
//! - Provide second precision completion timestamps and minute precision
//!   deadlines with stable textual forms.
//! - Provide an injectable clock so completion can be tested deterministically.
//!
//! # Invariants
//! - `CompletedAt` never carries sub-second data.
//! - `Deadline` never carries seconds or sub-second data.

use crate::model::task::TaskValidationError;
use chrono::{DateTime, Duration, NaiveDateTime, Timelike, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cell::Cell;
use std::fmt::{Display, Formatter};

/// Textual form of completion timestamps (`2025-10-26 11:05:21`).
pub const COMPLETED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Textual form of deadlines (`2025-10-28T18:30`).
pub const DEADLINE_FORMAT: &str = "%Y-%m-%dT%H:%M";

// Deadlines written with seconds are accepted and truncated.
const DEADLINE_FALLBACK_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Moment a task was marked complete, at second precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompletedAt(NaiveDateTime);

impl CompletedAt {
    /// Truncates `value` to whole seconds.
    pub fn from_datetime(value: NaiveDateTime) -> Self {
        Self(value.with_nanosecond(0).unwrap_or(value))
    }

    /// Parses the `YYYY-MM-DD HH:MM:SS` form. Returns `None` on any mismatch.
    pub fn parse(value: &str) -> Option<Self> {
        NaiveDateTime::parse_from_str(value.trim(), COMPLETED_AT_FORMAT)
            .ok()
            .map(Self)
    }

    pub fn as_datetime(&self) -> NaiveDateTime {
        self.0
    }
}

impl Display for CompletedAt {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(COMPLETED_AT_FORMAT))
    }
}

/// Optional due moment of a task, at minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Deadline(NaiveDateTime);

impl Deadline {
    /// Truncates `value` to whole minutes.
    pub fn from_datetime(value: NaiveDateTime) -> Self {
        let truncated = value
            .with_second(0)
            .and_then(|value| value.with_nanosecond(0))
            .unwrap_or(value);
        Self(truncated)
    }

    /// Parses `YYYY-MM-DDTHH:MM` (seconds are tolerated and dropped).
    ///
    /// Full RFC 3339 stamps such as `2025-10-28T09:30:00.000Z` are accepted
    /// and converted to UTC wall time.
    ///
    /// # Errors
    /// - Returns `TaskValidationError::InvalidDeadline` for any other shape.
    pub fn parse(value: &str) -> Result<Self, TaskValidationError> {
        let trimmed = value.trim();
        std::iter::once(DEADLINE_FORMAT)
            .chain(DEADLINE_FALLBACK_FORMATS.iter().copied())
            .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
            .or_else(|| {
                DateTime::parse_from_rfc3339(trimmed)
                    .ok()
                    .map(|value| value.naive_utc())
            })
            .map(Self::from_datetime)
            .ok_or_else(|| TaskValidationError::InvalidDeadline(trimmed.to_string()))
    }

    pub fn as_datetime(&self) -> NaiveDateTime {
        self.0
    }
}

impl Display for Deadline {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(DEADLINE_FORMAT))
    }
}

impl Serialize for Deadline {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Deadline {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Deadline::parse(&raw).map_err(D::Error::custom)
    }
}

/// Source of "now" for completion and export timestamps.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

/// Wall clock in UTC.
///
/// Completion stamps and export file names are UTC wall time, matching the
/// web storage format the ledger was designed against.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().naive_utc()
    }
}

/// Manually driven clock for tests and replay.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Cell<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, CompletedAt, Deadline, FixedClock, SystemClock};
    use chrono::{Duration, NaiveDate, Utc};

    fn at(h: u32, m: u32, s: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 10, 26)
            .unwrap()
            .and_hms_milli_opt(h, m, s, 750)
            .unwrap()
    }

    #[test]
    fn completed_at_drops_subsecond_and_formats() {
        let stamp = CompletedAt::from_datetime(at(11, 5, 21));
        assert_eq!(stamp.to_string(), "2025-10-26 11:05:21");
        assert_eq!(CompletedAt::parse("2025-10-26 11:05:21"), Some(stamp));
    }

    #[test]
    fn completed_at_parse_rejects_iso_t_separator() {
        assert_eq!(CompletedAt::parse("2025-10-26T11:05:21"), None);
        assert_eq!(CompletedAt::parse("yesterday"), None);
    }

    #[test]
    fn deadline_truncates_to_minutes() {
        let deadline = Deadline::from_datetime(at(18, 30, 42));
        assert_eq!(deadline.to_string(), "2025-10-26T18:30");
        assert_eq!(Deadline::parse("2025-10-26T18:30:59").unwrap(), deadline);
        assert_eq!(Deadline::parse(" 2025-10-26T18:30 ").unwrap(), deadline);
    }

    #[test]
    fn deadline_accepts_rfc3339_as_utc() {
        assert_eq!(
            Deadline::parse("2025-10-28T09:30:00.000Z").unwrap().to_string(),
            "2025-10-28T09:30"
        );
        assert_eq!(
            Deadline::parse("2025-10-28T11:30:00+02:00").unwrap().to_string(),
            "2025-10-28T09:30"
        );
    }

    #[test]
    fn system_clock_reads_utc_wall_time() {
        let before = Utc::now().naive_utc();
        let now = SystemClock.now();
        let after = Utc::now().naive_utc();
        assert!(before <= now && now <= after);
    }

    #[test]
    fn deadline_parse_rejects_garbage() {
        let error = Deadline::parse("next friday").unwrap_err();
        assert!(error.to_string().contains("next friday"));
    }

    #[test]
    fn deadline_serializes_as_plain_string() {
        let deadline = Deadline::parse("2025-10-28T09:00").unwrap();
        let json = serde_json::to_string(&deadline).unwrap();
        assert_eq!(json, "\"2025-10-28T09:00\"");
        let back: Deadline = serde_json::from_str(&json).unwrap();
        assert_eq!(back, deadline);
    }

    #[test]
    fn fixed_clock_advances() {
        let clock = FixedClock::new(at(8, 0, 0));
        clock.advance(Duration::seconds(90));
        assert_eq!(clock.now(), at(8, 1, 30));
    }
}
