//! Error types for slot-engine operations.

use chrono::{DateTime, NaiveTime, Utc, Weekday};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SlotError {
    #[error("Invalid service duration: {0} minutes (must be positive)")]
    InvalidDuration(i64),

    #[error("Invalid scan window: now {now} is after end {end}")]
    InvalidWindow {
        now: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Invalid scan horizon: {0} days is past the supported date range")]
    InvalidHorizon(u32),

    #[error("Malformed work-hour rule for {day}: end {end} is not after start {start}")]
    MalformedWorkHourRule {
        day: Weekday,
        start: NaiveTime,
        end: NaiveTime,
    },

    #[error("Malformed override block: end {end} is not after start {start}")]
    MalformedOverride {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Invalid day of week: {0} (expected 0..=6, 0 = Sunday)")]
    InvalidDayOfWeek(u8),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Service not found: {0}")]
    UnknownService(u32),

    #[error("Slot at {0} has already been taken")]
    SlotTaken(DateTime<Utc>),

    #[error("No open slot starts at {0}")]
    SlotUnavailable(DateTime<Utc>),
}

pub type Result<T> = std::result::Result<T, SlotError>;
