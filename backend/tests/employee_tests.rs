//! Attendance and payroll tests
//!
//! The tier table: 9 hours earns the full daily rate, 8.5 hours earns
//! the rate minus a fixed penalty, 5 hours earns half (integer
//! division), anything less earns nothing.

use proptest::prelude::*;
use chrono::{Duration, TimeZone, Utc};
use uuid::Uuid;

use shared::models::{salary_for_hours, Attendance, LATE_FINISH_PENALTY};

fn shift(hours_worked_secs: i64) -> Attendance {
    let check_in = Utc.with_ymd_and_hms(2025, 3, 1, 2, 0, 0).unwrap();
    Attendance {
        id: Uuid::new_v4(),
        employee_id: Uuid::new_v4(),
        store_id: None,
        check_in,
        check_out: Some(check_in + Duration::seconds(hours_worked_secs)),
        payroll_id: None,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    const DAILY: i64 = 150_000;

    #[test]
    fn nine_hours_earns_full_day() {
        assert_eq!(salary_for_hours(9.0, DAILY), DAILY);
        assert_eq!(salary_for_hours(10.5, DAILY), DAILY);
    }

    #[test]
    fn eight_and_a_half_hours_pays_the_penalty() {
        assert_eq!(salary_for_hours(8.5, DAILY), DAILY - LATE_FINISH_PENALTY);
        assert_eq!(salary_for_hours(8.99, DAILY), DAILY - LATE_FINISH_PENALTY);
    }

    #[test]
    fn five_hours_earns_half_a_day() {
        assert_eq!(salary_for_hours(5.0, DAILY), DAILY / 2);
        assert_eq!(salary_for_hours(8.49, DAILY), DAILY / 2);
    }

    /// Half a day is integer division: an odd rate rounds down
    #[test]
    fn half_day_rounds_down() {
        assert_eq!(salary_for_hours(6.0, 155_555), 77_777);
    }

    #[test]
    fn under_five_hours_earns_nothing() {
        assert_eq!(salary_for_hours(4.99, DAILY), 0);
        assert_eq!(salary_for_hours(0.0, DAILY), 0);
    }

    #[test]
    fn open_shift_has_zero_duration() {
        let open = Attendance {
            check_out: None,
            ..shift(0)
        };
        assert_eq!(open.duration_in_hours(), 0.0);
        assert_eq!(open.salary_earned(DAILY), 0);
    }

    /// hours_worked measures against the clock while still clocked in
    #[test]
    fn open_shift_hours_run_against_now() {
        let open = Attendance {
            check_out: None,
            ..shift(0)
        };
        let now = open.check_in + Duration::hours(3);
        assert!((open.hours_worked(now) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn closed_shift_duration_in_hours() {
        let nine_fifteen = shift(9 * 3600 + 15 * 60);
        assert!((nine_fifteen.duration_in_hours() - 9.25).abs() < 1e-9);
        assert_eq!(nine_fifteen.salary_earned(DAILY), DAILY);
    }

    /// An 8h40m shift lands in the penalty band
    #[test]
    fn penalty_band_shift() {
        let shift = shift(8 * 3600 + 40 * 60);
        assert_eq!(shift.salary_earned(DAILY), DAILY - LATE_FINISH_PENALTY);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every payout is one of the four tier values
    #[test]
    fn prop_salary_is_one_of_the_tiers(
        hours in 0.0f64..16.0,
        daily in 20_000i64..500_000
    ) {
        let pay = salary_for_hours(hours, daily);
        let tiers = [daily, daily - LATE_FINISH_PENALTY, daily / 2, 0];
        prop_assert!(tiers.contains(&pay));
    }

    /// Tier boundaries are lower-inclusive
    #[test]
    fn prop_tier_boundaries(daily in 20_000i64..500_000) {
        prop_assert_eq!(salary_for_hours(9.0, daily), daily);
        prop_assert_eq!(salary_for_hours(8.5, daily), daily - LATE_FINISH_PENALTY);
        prop_assert_eq!(salary_for_hours(5.0, daily), daily / 2);
        prop_assert_eq!(salary_for_hours(4.999, daily), 0);
    }

    /// A shift's pay depends only on its length, not when it started
    #[test]
    fn prop_pay_ignores_start_time(
        start_hour in 0u32..14,
        length_secs in 0i64..57_600,
        daily in 20_000i64..500_000
    ) {
        let check_in = Utc.with_ymd_and_hms(2025, 3, 1, start_hour, 0, 0).unwrap();
        let moved = Attendance {
            id: Uuid::new_v4(),
            employee_id: Uuid::new_v4(),
            store_id: None,
            check_in,
            check_out: Some(check_in + Duration::seconds(length_secs)),
            payroll_id: None,
        };

        prop_assert_eq!(moved.salary_earned(daily), shift(length_secs).salary_earned(daily));
    }
}
