//! Reference-timezone normalization.
//!
//! Work hours are local clock times on a calendar day. The UTC offset used to
//! convert them is resolved separately for every day at local midday, so a
//! scan window that crosses a DST transition converts each day with its own
//! offset.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{Result, SlotError};
use crate::window::ScanWindow;

/// Parse an IANA timezone name (e.g., "Asia/Jerusalem").
pub fn parse_zone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| SlotError::InvalidTimezone(name.to_string()))
}

/// UTC offset of `zone` at local midday on `date`, in seconds east of UTC.
///
/// Midday is never inside a DST gap for real-world zones; if it is, the offset
/// in effect at the same wall-clock reading taken as UTC is used instead.
pub fn offset_at_midday(zone: Tz, date: NaiveDate) -> i32 {
    let midday = date.and_time(NaiveTime::MIN) + Duration::hours(12);
    zone.from_local_datetime(&midday)
        .earliest()
        .map(|dt| dt.offset().fix())
        .unwrap_or_else(|| zone.offset_from_utc_datetime(&midday).fix())
        .local_minus_utc()
}

/// Convert local clock `time` on `date` to UTC using that day's midday offset.
///
/// At the edges of the representable range the result saturates to
/// `DateTime::<Utc>::MIN_UTC` or `MAX_UTC`.
pub fn local_to_utc(zone: Tz, date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    let offset = Duration::seconds(i64::from(offset_at_midday(zone, date)));
    match date.and_time(time).checked_sub_signed(offset) {
        Some(utc) => utc.and_utc(),
        None if offset > Duration::zero() => DateTime::<Utc>::MIN_UTC,
        None => DateTime::<Utc>::MAX_UTC,
    }
}

/// Local calendar days touched by `window`, starting at the local date of
/// `window.now` and stopping before the first day whose local midnight is at
/// or after `window.end`.
pub fn local_days(zone: Tz, window: &ScanWindow) -> impl Iterator<Item = NaiveDate> {
    let first = window.now.with_timezone(&zone).date_naive();
    let end = window.end;
    std::iter::successors(Some(first), |day| day.succ_opt())
        .take_while(move |day| local_to_utc(zone, *day, NaiveTime::MIN) < end)
}
