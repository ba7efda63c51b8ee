//! Bookable slot computation.
//!
//! Slots are generated back to back at a stride equal to the service duration,
//! first from the recurring work hours of every local day in the scan window,
//! then from each special-opening override. Recurring slots are dropped when
//! they are booked or overlap a blackout; opening slots are dropped only when
//! booked. The two passes are unioned into one ascending set.

use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Datelike, Duration, Utc};
use chrono_tz::Tz;

use crate::error::{Result, SlotError};
use crate::schedule::{self, OverrideBlock, Schedule, WorkHourRule};
use crate::window::ScanWindow;
use crate::zone;

/// Compute every open slot start within `window`.
///
/// # Arguments
///
/// * `duration_minutes` — Service duration; also the stride between candidates.
/// * `window` — Half-open range of start instants to consider.
/// * `zone` — Reference timezone the work hours are authored in.
/// * `weekly_hours` — Recurring rules; the first rule for a weekday wins.
/// * `overrides` — Blackouts and special openings, in UTC.
/// * `booked` — Starts already taken.
///
/// # Errors
///
/// All inputs are validated before any slot is generated:
/// `InvalidDuration` for a non-positive duration, `InvalidWindow` when
/// `window.now > window.end`, `MalformedWorkHourRule` and `MalformedOverride`
/// for inverted intervals.
pub fn compute_availability(
    duration_minutes: i64,
    window: &ScanWindow,
    zone: Tz,
    weekly_hours: &[WorkHourRule],
    overrides: &[OverrideBlock],
    booked: &HashSet<DateTime<Utc>>,
) -> Result<BTreeSet<DateTime<Utc>>> {
    let duration = slot_duration(duration_minutes)?;
    window.validate()?;
    weekly_hours.iter().try_for_each(WorkHourRule::validate)?;
    overrides.iter().try_for_each(OverrideBlock::validate)?;

    let blackouts: Vec<&OverrideBlock> = overrides.iter().filter(|b| !b.is_available).collect();
    let mut slots = BTreeSet::new();

    for day in zone::local_days(zone, window) {
        let Some(rule) = schedule::rule_for(weekly_hours, day.weekday()) else {
            continue;
        };
        let work_start = zone::local_to_utc(zone, day, rule.start_of_day);
        let work_end = zone::local_to_utc(zone, day, rule.end_of_day);

        slots.extend(
            candidates(work_start, work_end, duration, window).filter(|start| {
                !booked.contains(start)
                    && !blackouts.iter().any(|b| b.overlaps(*start, slot_end(*start, duration)))
            }),
        );
    }

    // Openings are authoritative for their own span: blackouts are not re-applied.
    for opening in overrides.iter().filter(|b| b.is_available) {
        slots.extend(
            candidates(opening.start, opening.end, duration, window)
                .filter(|start| !booked.contains(start)),
        );
    }

    Ok(slots)
}

/// [`compute_availability`] over a loaded [`Schedule`].
pub fn available_slots(
    duration_minutes: i64,
    window: &ScanWindow,
    zone: Tz,
    schedule: &Schedule,
    booked: &HashSet<DateTime<Utc>>,
) -> Result<BTreeSet<DateTime<Utc>>> {
    compute_availability(
        duration_minutes,
        window,
        zone,
        &schedule.work_hours,
        &schedule.overrides,
        booked,
    )
}

fn slot_duration(minutes: i64) -> Result<Duration> {
    if minutes <= 0 {
        return Err(SlotError::InvalidDuration(minutes));
    }
    Duration::try_minutes(minutes).ok_or(SlotError::InvalidDuration(minutes))
}

/// Back-to-back starts inside `[start, end)` that fit a whole slot, clamped
/// to `window`.
fn candidates(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    duration: Duration,
    window: &ScanWindow,
) -> impl Iterator<Item = DateTime<Utc>> {
    let limit = window.end;
    std::iter::successors(Some(start.max(window.now)), move |s| s.checked_add_signed(duration))
        .take_while(move |s| {
            *s < limit && s.checked_add_signed(duration).is_some_and(|e| e <= end)
        })
}

/// End of the slot starting at `start`, saturating at the latest instant.
fn slot_end(start: DateTime<Utc>, duration: Duration) -> DateTime<Utc> {
    start
        .checked_add_signed(duration)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
