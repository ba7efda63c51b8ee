//! Property-based tests for slot generation using proptest.
//!
//! These check invariants that must hold for *any* schedule, not just the
//! worked examples in `availability_tests.rs`.

use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Datelike, Duration, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use proptest::prelude::*;
use slot_engine::availability::compute_availability;
use slot_engine::schedule::{rule_for, weekday_from_index, OverrideBlock, WorkHourRule};
use slot_engine::window::ScanWindow;
use slot_engine::zone::local_to_utc;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_zone() -> impl Strategy<Value = Tz> {
    prop_oneof![
        Just(Tz::UTC),
        Just(chrono_tz::America::New_York),
        Just(chrono_tz::Europe::London),
        Just(chrono_tz::Asia::Jerusalem),
        Just(chrono_tz::Asia::Tokyo),
    ]
}

/// A `now` somewhere in 2026, on a 5-minute grid.
fn arb_now() -> impl Strategy<Value = DateTime<Utc>> {
    (1u32..=12, 1u32..=28, 0u32..=23, 0u32..12).prop_map(|(m, d, h, five)| {
        Utc.with_ymd_and_hms(2026, m, d, h, five * 5, 0).unwrap()
    })
}

fn arb_horizon() -> impl Strategy<Value = u32> {
    1u32..=14
}

fn arb_duration() -> impl Strategy<Value = i64> {
    prop_oneof![Just(15i64), Just(20), Just(30), Just(45), Just(60), Just(90)]
}

/// A rule starting between 00:00 and 20:45 that lasts 30 minutes to 6 hours,
/// capped at 23:59.
fn arb_rule() -> impl Strategy<Value = WorkHourRule> {
    (0u8..7, 0u32..=20, 0u32..4, 30i64..=360).prop_map(|(day, h, quarter, len)| {
        let start = NaiveTime::from_hms_opt(h, quarter * 15, 0).unwrap();
        let latest = NaiveTime::from_hms_opt(23, 59, 0).unwrap();
        // Adding past midnight wraps around; clamp those to 23:59.
        let end = (start + Duration::minutes(len)).min(latest);
        let end = if end <= start { latest } else { end };
        WorkHourRule::new(weekday_from_index(day).unwrap(), start, end)
    })
}

fn arb_rules() -> impl Strategy<Value = Vec<WorkHourRule>> {
    prop::collection::vec(arb_rule(), 0..7)
}

/// Overrides placed relative to `now`: offset and length in minutes.
fn arb_override_specs() -> impl Strategy<Value = Vec<(i64, i64, bool)>> {
    prop::collection::vec((-600i64..(14 * 1440), 15i64..=600, any::<bool>()), 0..6)
}

fn overrides_from(now: DateTime<Utc>, specs: &[(i64, i64, bool)]) -> Vec<OverrideBlock> {
    specs
        .iter()
        .map(|&(offset, len, is_available)| {
            let start = now + Duration::minutes(offset);
            OverrideBlock {
                start,
                end: start + Duration::minutes(len),
                is_available,
            }
        })
        .collect()
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 128,
        ..ProptestConfig::default()
    }
}

fn slots(
    duration: i64,
    window: &ScanWindow,
    zone: Tz,
    rules: &[WorkHourRule],
    overrides: &[OverrideBlock],
    booked: &HashSet<DateTime<Utc>>,
) -> BTreeSet<DateTime<Utc>> {
    compute_availability(duration, window, zone, rules, overrides, booked)
        .expect("generated inputs are valid")
}

// ---------------------------------------------------------------------------
// Property 1: Every slot lies inside the window and output is strictly ascending
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn slots_are_ascending_and_inside_window(
        zone in arb_zone(),
        now in arb_now(),
        horizon in arb_horizon(),
        duration in arb_duration(),
        rules in arb_rules(),
        specs in arb_override_specs(),
    ) {
        let window = ScanWindow::rolling(now, horizon).unwrap();
        let overrides = overrides_from(now, &specs);
        let out: Vec<_> = slots(duration, &window, zone, &rules, &overrides, &HashSet::new())
            .into_iter()
            .collect();

        for s in &out {
            prop_assert!(*s >= window.now, "slot {} before now {}", s, window.now);
            prop_assert!(*s < window.end, "slot {} at or after end {}", s, window.end);
        }
        for pair in out.windows(2) {
            prop_assert!(pair[0] < pair[1], "not strictly ascending: {} then {}", pair[0], pair[1]);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 2: Identical inputs produce identical output
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn computation_is_deterministic(
        zone in arb_zone(),
        now in arb_now(),
        horizon in arb_horizon(),
        duration in arb_duration(),
        rules in arb_rules(),
        specs in arb_override_specs(),
    ) {
        let window = ScanWindow::rolling(now, horizon).unwrap();
        let overrides = overrides_from(now, &specs);

        let first: Vec<_> = slots(duration, &window, zone, &rules, &overrides, &HashSet::new())
            .into_iter()
            .collect();
        let second: Vec<_> = slots(duration, &window, zone, &rules, &overrides, &HashSet::new())
            .into_iter()
            .collect();

        prop_assert_eq!(first, second);
    }
}

// ---------------------------------------------------------------------------
// Property 3: Booked starts never appear, and booking only removes slots
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn booked_starts_are_never_offered(
        zone in arb_zone(),
        now in arb_now(),
        horizon in arb_horizon(),
        duration in arb_duration(),
        rules in arb_rules(),
        specs in arb_override_specs(),
    ) {
        let window = ScanWindow::rolling(now, horizon).unwrap();
        let overrides = overrides_from(now, &specs);
        let open = slots(duration, &window, zone, &rules, &overrides, &HashSet::new());

        // Book every other offered slot.
        let booked: HashSet<_> = open.iter().step_by(2).copied().collect();
        let remaining = slots(duration, &window, zone, &rules, &overrides, &booked);

        for s in &remaining {
            prop_assert!(!booked.contains(s), "booked start {} offered", s);
            prop_assert!(open.contains(s), "booking added slot {}", s);
        }
        prop_assert_eq!(remaining.len() + booked.len(), open.len());
    }
}

// ---------------------------------------------------------------------------
// Property 4: No recurring slot overlaps a blackout
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn blackouts_are_respected(
        zone in arb_zone(),
        now in arb_now(),
        horizon in arb_horizon(),
        duration in arb_duration(),
        rules in arb_rules(),
        specs in arb_override_specs(),
    ) {
        let window = ScanWindow::rolling(now, horizon).unwrap();
        let blackouts: Vec<_> = overrides_from(now, &specs)
            .into_iter()
            .map(|b| OverrideBlock { is_available: false, ..b })
            .collect();
        let d = Duration::minutes(duration);

        for s in slots(duration, &window, zone, &rules, &blackouts, &HashSet::new()) {
            for b in &blackouts {
                prop_assert!(
                    !(s < b.end && s + d > b.start),
                    "slot {} overlaps blackout {}..{}",
                    s,
                    b.start,
                    b.end
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Property 5: Every slot fits inside a work-hour interval or an opening
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn slots_fit_inside_an_open_interval(
        zone in arb_zone(),
        now in arb_now(),
        horizon in arb_horizon(),
        duration in arb_duration(),
        rules in arb_rules(),
        specs in arb_override_specs(),
    ) {
        let window = ScanWindow::rolling(now, horizon).unwrap();
        let overrides = overrides_from(now, &specs);
        let d = Duration::minutes(duration);

        for s in slots(duration, &window, zone, &rules, &overrides, &HashSet::new()) {
            let local = s.with_timezone(&zone).date_naive();
            let in_rule = [local.pred_opt(), Some(local), local.succ_opt()]
                .into_iter()
                .flatten()
                .any(|day| match rule_for(&rules, day.weekday()) {
                    Some(r) => {
                        local_to_utc(zone, day, r.start_of_day) <= s
                            && s + d <= local_to_utc(zone, day, r.end_of_day)
                    }
                    None => false,
                });
            let in_opening = overrides
                .iter()
                .any(|o| o.is_available && o.start <= s && s + d <= o.end);

            prop_assert!(in_rule || in_opening, "slot {} has no open interval", s);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 6: Within one working day, consecutive slots are one duration apart
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn stride_equals_duration(
        now in arb_now(),
        horizon in arb_horizon(),
        duration in arb_duration(),
        rules in arb_rules(),
    ) {
        let window = ScanWindow::rolling(now, horizon).unwrap();
        let out: Vec<_> = slots(duration, &window, Tz::UTC, &rules, &[], &HashSet::new())
            .into_iter()
            .collect();

        for pair in out.windows(2) {
            if pair[0].date_naive() == pair[1].date_naive() {
                prop_assert_eq!(pair[1] - pair[0], Duration::minutes(duration));
            }
        }
    }
}
