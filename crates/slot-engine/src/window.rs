//! The half-open range of slot start instants an availability query scans.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};

/// Days scanned by the reference booking policy.
pub const DEFAULT_HORIZON_DAYS: u32 = 14;

/// Start instants `s` with `now <= s < end` are considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanWindow {
    /// The caller's current instant; no slot starts before it.
    pub now: DateTime<Utc>,
    /// Exclusive upper bound for slot starts.
    pub end: DateTime<Utc>,
}

impl ScanWindow {
    /// Build a validated window; fails with `InvalidWindow` when `now > end`.
    pub fn new(now: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        let window = Self { now, end };
        window.validate()?;
        Ok(window)
    }

    /// The rolling policy window: from `now` to UTC midnight of `now`'s date
    /// plus `horizon_days`.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidHorizon` when the end falls outside the
    /// representable date range.
    pub fn rolling(now: DateTime<Utc>, horizon_days: u32) -> Result<Self> {
        let midnight = now.date_naive().and_time(chrono::NaiveTime::MIN).and_utc();
        let end = Duration::try_days(i64::from(horizon_days))
            .and_then(|horizon| midnight.checked_add_signed(horizon))
            .ok_or(SlotError::InvalidHorizon(horizon_days))?;
        Ok(Self { now, end })
    }

    /// Reject a window whose `now` lies after its `end`.
    pub fn validate(&self) -> Result<()> {
        if self.now > self.end {
            return Err(SlotError::InvalidWindow {
                now: self.now,
                end: self.end,
            });
        }
        Ok(())
    }

    /// Whether `instant` is a start this window considers.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.now <= instant && instant < self.end
    }
}
