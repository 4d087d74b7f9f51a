//! Dashboard bucketing tests
//!
//! Jakarta civil-time conversion and the half-open time-of-day
//! buckets. The boundary cases matter: 10:59:59 is Morning, 11:00:00
//! is Lunch.

use proptest::prelude::*;
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};

use shared::types::{jakarta, local_date, local_time, DateRange, TimeDivision};

fn t(h: u32, m: u32, s: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, s).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn jakarta_is_utc_plus_seven() {
        assert_eq!(jakarta().local_minus_utc(), 7 * 3600);
    }

    /// 01:30 UTC is 08:30 in Jakarta, same calendar day
    #[test]
    fn local_date_same_day() {
        let instant = Utc.with_ymd_and_hms(2025, 3, 1, 1, 30, 0).unwrap();
        assert_eq!(
            local_date(instant),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
        );
        assert_eq!(local_time(instant), t(8, 30, 0));
    }

    /// 19:00 UTC is 02:00 the next day in Jakarta
    #[test]
    fn local_date_rolls_over_at_utc_evening() {
        let instant = Utc.with_ymd_and_hms(2025, 3, 1, 19, 0, 0).unwrap();
        assert_eq!(
            local_date(instant),
            NaiveDate::from_ymd_opt(2025, 3, 2).unwrap()
        );
        assert_eq!(local_time(instant), t(2, 0, 0));
    }

    /// The half-open boundary: one second before eleven is still
    /// Morning, eleven exactly is Lunch
    #[test]
    fn eleven_oclock_boundary() {
        assert!(TimeDivision::Morning.contains(t(10, 59, 59)));
        assert!(!TimeDivision::Morning.contains(t(11, 0, 0)));
        assert!(TimeDivision::Lunch.contains(t(11, 0, 0)));
        assert!(!TimeDivision::Lunch.contains(t(10, 59, 59)));
    }

    #[test]
    fn bucket_bounds() {
        assert_eq!(TimeDivision::Morning.bounds(), (t(9, 0, 0), t(11, 0, 0)));
        assert_eq!(TimeDivision::Lunch.bounds(), (t(11, 0, 0), t(13, 0, 0)));
        assert_eq!(TimeDivision::AfterLunch.bounds(), (t(13, 0, 0), t(15, 0, 0)));
        assert_eq!(TimeDivision::Afternoon.bounds(), (t(15, 0, 0), t(18, 0, 0)));
    }

    /// Outside opening hours nothing matches
    #[test]
    fn off_hours_belong_to_no_bucket() {
        for division in TimeDivision::ALL {
            assert!(!division.contains(t(8, 59, 59)));
            assert!(!division.contains(t(18, 0, 0)));
            assert!(!division.contains(t(23, 30, 0)));
        }
    }

    #[test]
    fn labels_carry_hour_ranges() {
        assert_eq!(TimeDivision::Morning.label(), "Morning (09-11)");
        assert_eq!(TimeDivision::Afternoon.label(), "Afternoon (15-18)");
    }

    #[test]
    fn parse_accepts_snake_case_only() {
        assert_eq!(TimeDivision::parse("morning"), Some(TimeDivision::Morning));
        assert_eq!(
            TimeDivision::parse("after_lunch"),
            Some(TimeDivision::AfterLunch)
        );
        assert_eq!(TimeDivision::parse("Morning"), None);
        assert_eq!(TimeDivision::parse(""), None);
    }

    #[test]
    fn date_range_bounds_are_inclusive() {
        let range = DateRange {
            start: Some(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()),
            end: Some(NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()),
        };

        assert!(range.contains(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()));
        assert!(range.contains(NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()));
    }

    /// An inverted range matches no date at all, so every aggregate
    /// built over it is empty rather than an error
    #[test]
    fn inverted_range_contains_nothing() {
        let range = DateRange {
            start: Some(NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()),
            end: Some(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()),
        };
        assert!(!range.contains(NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()));
    }

    #[test]
    fn open_ended_range_accepts_everything_on_that_side() {
        let range = DateRange {
            start: None,
            end: Some(NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()),
        };
        assert!(range.contains(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

fn time_strategy() -> impl Strategy<Value = NaiveTime> {
    (0u32..24, 0u32..60, 0u32..60)
        .prop_map(|(h, m, s)| NaiveTime::from_hms_opt(h, m, s).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The four buckets never overlap: a wall-clock time matches at
    /// most one, and inside opening hours exactly one
    #[test]
    fn prop_buckets_partition_opening_hours(time in time_strategy()) {
        let matches = TimeDivision::ALL
            .iter()
            .filter(|d| d.contains(time))
            .count();

        let open = t(9, 0, 0) <= time && time < t(18, 0, 0);
        if open {
            prop_assert_eq!(matches, 1);
        } else {
            prop_assert_eq!(matches, 0);
        }
    }

    /// A range with start after end excludes every date
    #[test]
    fn prop_inverted_range_is_empty(
        start_offset in 1i64..1000,
        candidate_offset in -2000i64..2000
    ) {
        let end = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let start = end + chrono::Duration::days(start_offset);
        let range = DateRange { start: Some(start), end: Some(end) };

        let candidate = end + chrono::Duration::days(candidate_offset);
        prop_assert!(!range.contains(candidate));
    }

    /// Jakarta conversion is a pure +7h shift: the local wall clock
    /// differs from UTC by exactly seven hours
    #[test]
    fn prop_local_time_is_utc_plus_seven(secs in 0i64..86_400, day in 0i64..365) {
        let instant = Utc
            .with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
            .unwrap()
            + chrono::Duration::days(day)
            + chrono::Duration::seconds(secs);

        let local = instant.with_timezone(&jakarta());
        prop_assert_eq!(local.timestamp(), instant.timestamp());
        prop_assert_eq!(local.date_naive(), local_date(instant));
        prop_assert_eq!(local.time(), local_time(instant));
    }
}
