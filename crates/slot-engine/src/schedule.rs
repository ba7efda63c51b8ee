//! Recurring work hours and ad-hoc override blocks.
//!
//! Work hours are authored in the reference timezone's local clock time and
//! recur weekly. Override blocks are absolute UTC intervals that either black
//! out time inside normal hours or open extra time outside them.

use chrono::{DateTime, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};

/// A recurring weekly working interval in local business time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkHourRule {
    /// Serialized as `0..=6` with `0 = Sunday`.
    #[serde(with = "weekday_index")]
    pub day_of_week: Weekday,
    /// Local clock time the working interval opens.
    pub start_of_day: NaiveTime,
    /// Local clock time it closes; must be after `start_of_day`.
    pub end_of_day: NaiveTime,
}

impl WorkHourRule {
    pub fn new(day_of_week: Weekday, start_of_day: NaiveTime, end_of_day: NaiveTime) -> Self {
        Self {
            day_of_week,
            start_of_day,
            end_of_day,
        }
    }

    /// Reject rules whose end of day does not come after their start.
    pub fn validate(&self) -> Result<()> {
        if self.end_of_day <= self.start_of_day {
            return Err(SlotError::MalformedWorkHourRule {
                day: self.day_of_week,
                start: self.start_of_day,
                end: self.end_of_day,
            });
        }
        Ok(())
    }
}

/// An ad-hoc UTC interval `[start, end)`.
///
/// `is_available = false` is a blackout (holiday, lunch); `true` is a special
/// opening outside the recurring hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideBlock {
    /// Inclusive start, UTC.
    pub start: DateTime<Utc>,
    /// Exclusive end, UTC.
    pub end: DateTime<Utc>,
    /// `true` for a special opening, `false` for a blackout.
    pub is_available: bool,
}

impl OverrideBlock {
    /// A block that suppresses recurring slots overlapping it.
    pub fn blackout(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            is_available: false,
        }
    }

    /// A block that offers slots regardless of the recurring hours.
    pub fn opening(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            is_available: true,
        }
    }

    /// Reject blocks whose end does not come after their start.
    pub fn validate(&self) -> Result<()> {
        if self.end <= self.start {
            return Err(SlotError::MalformedOverride {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// Half-open overlap with `[start, end)`. Touching intervals do not overlap.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start < self.end && end > self.start
    }
}

/// The schedule data loaded for one availability query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Recurring weekly hours.
    #[serde(default)]
    pub work_hours: Vec<WorkHourRule>,
    /// Blackouts and special openings.
    #[serde(default)]
    pub overrides: Vec<OverrideBlock>,
}

/// The rule consulted for `day`. First match wins.
pub fn rule_for(weekly_hours: &[WorkHourRule], day: Weekday) -> Option<&WorkHourRule> {
    weekly_hours.iter().find(|rule| rule.day_of_week == day)
}

/// Weekdays that carry more than one rule, in Sunday-first order.
///
/// Only the first rule for such a day is ever used; callers should surface
/// these as a data-quality problem.
pub fn duplicate_weekdays(weekly_hours: &[WorkHourRule]) -> Vec<Weekday> {
    let mut counts = [0usize; 7];
    for rule in weekly_hours {
        counts[rule.day_of_week.num_days_from_sunday() as usize] += 1;
    }
    counts
        .iter()
        .enumerate()
        .filter(|&(_, &n)| n > 1)
        .filter_map(|(i, _)| weekday_from_index(i as u8).ok())
        .collect()
}

/// Map `0..=6` (`0 = Sunday`) to a [`Weekday`].
pub fn weekday_from_index(index: u8) -> Result<Weekday> {
    match index {
        0 => Ok(Weekday::Sun),
        1 => Ok(Weekday::Mon),
        2 => Ok(Weekday::Tue),
        3 => Ok(Weekday::Wed),
        4 => Ok(Weekday::Thu),
        5 => Ok(Weekday::Fri),
        6 => Ok(Weekday::Sat),
        other => Err(SlotError::InvalidDayOfWeek(other)),
    }
}

mod weekday_index {
    use chrono::Weekday;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(day: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(day.num_days_from_sunday() as u8)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Weekday, D::Error> {
        let index = u8::deserialize(deserializer)?;
        super::weekday_from_index(index).map_err(serde::de::Error::custom)
    }
}
