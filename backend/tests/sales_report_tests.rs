//! Sales breakdown tests
//!
//! One filtered line set feeds every aggregate: the daily series, the
//! menu mix, the time-of-day counts and the payment totals all narrow
//! together. Revenue is the stored order total credited once per
//! order, so a multi-line order never double-counts and a later price
//! edit never rewrites history.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use uuid::Uuid;

use shared::models::{sales_breakdown, SaleLine, SalesFilter};
use shared::types::{jakarta, DateRange, TimeDivision};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// An instant from a Jakarta wall-clock time
fn at(date: NaiveDate, h: u32, min: u32) -> DateTime<Utc> {
    jakarta()
        .from_local_datetime(&date.and_hms_opt(h, min, 0).unwrap())
        .unwrap()
        .with_timezone(&Utc)
}

fn line(
    order_id: Uuid,
    created_at: DateTime<Utc>,
    order_total: i64,
    payment_method: Option<&str>,
    menu_item_id: Uuid,
    menu_name: &str,
    quantity: i32,
) -> SaleLine {
    SaleLine {
        order_id,
        created_at,
        order_total,
        payment_method: payment_method.map(str::to_string),
        menu_item_id,
        menu_name: menu_name.to_string(),
        quantity,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// A two-line order contributes its stored total to its day once,
    /// not the sum of line quantity times current price
    #[test]
    fn multi_line_order_credits_its_total_once() {
        let order = Uuid::new_v4();
        let when = at(d(2025, 3, 1), 10, 0);
        let lines = vec![
            line(order, when, 80_000, Some("Cash"), Uuid::new_v4(), "Mango", 2),
            line(order, when, 80_000, Some("Cash"), Uuid::new_v4(), "Avocado", 1),
        ];

        let report = sales_breakdown(&lines, &SalesFilter::default());

        assert_eq!(report.sales_by_day.len(), 1);
        assert_eq!(report.sales_by_day[0].revenue, 80_000);
        assert_eq!(report.sales_by_day[0].cups, 3);
        assert_eq!(report.payment_methods.len(), 1);
        assert_eq!(report.payment_methods[0].order_count, 1);
        assert_eq!(report.payment_methods[0].revenue, 80_000);
    }

    /// Narrowing to one menu item keeps the matching orders whole:
    /// their stored totals stay intact while cups shrink to the
    /// matching lines
    #[test]
    fn menu_filter_keeps_matching_orders_whole() {
        let mango = Uuid::new_v4();
        let avocado = Uuid::new_v4();
        let order = Uuid::new_v4();
        let when = at(d(2025, 3, 1), 10, 0);
        let lines = vec![
            line(order, when, 80_000, Some("Cash"), mango, "Mango", 2),
            line(order, when, 80_000, Some("Cash"), avocado, "Avocado", 1),
        ];

        let filter = SalesFilter {
            menu_item_ids: Some(vec![mango]),
            ..Default::default()
        };
        let report = sales_breakdown(&lines, &filter);

        assert_eq!(report.sales_by_day[0].revenue, 80_000);
        assert_eq!(report.sales_by_day[0].cups, 2);
        assert_eq!(report.menu_share.len(), 1);
        assert_eq!(report.menu_share[0].cups, 2);
    }

    /// The menu filter narrows the payment totals to orders containing
    /// that menu item, same order set as the daily series
    #[test]
    fn menu_filter_narrows_payment_totals() {
        let mango = Uuid::new_v4();
        let avocado = Uuid::new_v4();
        let when = at(d(2025, 3, 1), 10, 0);
        let lines = vec![
            line(Uuid::new_v4(), when, 50_000, Some("Cash"), mango, "Mango", 2),
            line(Uuid::new_v4(), when, 30_000, Some("QRIS"), avocado, "Avocado", 1),
        ];

        let filter = SalesFilter {
            menu_item_ids: Some(vec![mango]),
            ..Default::default()
        };
        let report = sales_breakdown(&lines, &filter);

        assert_eq!(report.payment_methods.len(), 1);
        assert_eq!(report.payment_methods[0].payment_method, "Cash");
        assert_eq!(report.payment_methods[0].revenue, 50_000);
    }

    /// The time-of-day filter narrows the payment totals too
    #[test]
    fn time_division_filter_narrows_payment_totals() {
        let day = d(2025, 3, 1);
        let lines = vec![
            line(
                Uuid::new_v4(),
                at(day, 10, 0),
                50_000,
                Some("Cash"),
                Uuid::new_v4(),
                "Mango",
                2,
            ),
            line(
                Uuid::new_v4(),
                at(day, 12, 0),
                30_000,
                Some("QRIS"),
                Uuid::new_v4(),
                "Avocado",
                1,
            ),
        ];

        let filter = SalesFilter {
            time_division: Some(TimeDivision::Lunch),
            ..Default::default()
        };
        let report = sales_breakdown(&lines, &filter);

        assert_eq!(report.payment_methods.len(), 1);
        assert_eq!(report.payment_methods[0].payment_method, "QRIS");
        assert_eq!(report.payment_methods[0].order_count, 1);
        assert_eq!(report.payment_methods[0].revenue, 30_000);
        assert_eq!(report.sales_by_day[0].revenue, 30_000);
    }

    /// Orders without a payment method still count toward revenue but
    /// stay out of the per-method breakdown
    #[test]
    fn orders_without_payment_method_skip_the_method_breakdown() {
        let when = at(d(2025, 3, 1), 10, 0);
        let lines = vec![line(
            Uuid::new_v4(),
            when,
            25_000,
            None,
            Uuid::new_v4(),
            "Mango",
            1,
        )];

        let report = sales_breakdown(&lines, &SalesFilter::default());

        assert_eq!(report.sales_by_day[0].revenue, 25_000);
        assert!(report.payment_methods.is_empty());
    }

    /// A window with no sales yields empty series across the board
    #[test]
    fn empty_window_yields_empty_series() {
        let when = at(d(2025, 3, 1), 10, 0);
        let lines = vec![line(
            Uuid::new_v4(),
            when,
            25_000,
            Some("Cash"),
            Uuid::new_v4(),
            "Mango",
            1,
        )];

        let filter = SalesFilter {
            range: DateRange {
                start: Some(d(2025, 4, 1)),
                end: Some(d(2025, 4, 30)),
            },
            ..Default::default()
        };
        let report = sales_breakdown(&lines, &filter);

        assert!(report.sales_by_day.is_empty());
        assert!(report.menu_share.is_empty());
        assert!(report.payment_methods.is_empty());
        assert!(report.time_divisions.iter().all(|tc| tc.cups == 0));
    }

    /// Every bound applies at once: a line must pass the range, the
    /// menu subset and the bucket together
    #[test]
    fn filter_requires_every_bound() {
        let mango = Uuid::new_v4();
        let sale = line(
            Uuid::new_v4(),
            at(d(2025, 3, 1), 10, 0),
            25_000,
            Some("Cash"),
            mango,
            "Mango",
            1,
        );

        let mut filter = SalesFilter {
            range: DateRange {
                start: Some(d(2025, 3, 1)),
                end: Some(d(2025, 3, 1)),
            },
            menu_item_ids: Some(vec![mango]),
            time_division: Some(TimeDivision::Morning),
        };
        assert!(filter.matches(&sale));

        filter.time_division = Some(TimeDivision::Lunch);
        assert!(!filter.matches(&sale));

        filter.time_division = Some(TimeDivision::Morning);
        filter.menu_item_ids = Some(vec![Uuid::new_v4()]);
        assert!(!filter.matches(&sale));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

fn order_strategy() -> impl Strategy<Value = (i64, Vec<i32>, u32)> {
    // (stored total, line quantities, opening hour)
    (
        1i64..500_000,
        prop::collection::vec(1i32..5, 1..4),
        9u32..18,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// With every order paid by some method, the per-method revenue
    /// and the daily revenue both sum to the same figure: each order's
    /// stored total exactly once
    #[test]
    fn prop_every_order_total_counted_once(
        orders in prop::collection::vec(order_strategy(), 0..15)
    ) {
        let menu = Uuid::new_v4();
        let methods = ["Cash", "QRIS", "Transfer"];
        let day = d(2025, 3, 1);

        let mut lines = Vec::new();
        for (i, (total, quantities, hour)) in orders.iter().enumerate() {
            let order_id = Uuid::new_v4();
            let method = methods[i % methods.len()];
            for qty in quantities {
                lines.push(line(order_id, at(day, *hour, 0), *total, Some(method), menu, "Mango", *qty));
            }
        }

        let report = sales_breakdown(&lines, &SalesFilter::default());

        let expected: i64 = orders.iter().map(|(total, _, _)| total).sum();
        let daily: i64 = report.sales_by_day.iter().map(|p| p.revenue).sum();
        let by_method: i64 = report.payment_methods.iter().map(|t| t.revenue).sum();
        let order_count: i64 = report.payment_methods.iter().map(|t| t.order_count).sum();

        prop_assert_eq!(daily, expected);
        prop_assert_eq!(by_method, expected);
        prop_assert_eq!(order_count, orders.len() as i64);
    }

    /// Cups always come from the surviving lines regardless of how
    /// orders group them
    #[test]
    fn prop_cups_sum_the_lines(
        orders in prop::collection::vec(order_strategy(), 0..15)
    ) {
        let menu = Uuid::new_v4();
        let day = d(2025, 3, 1);

        let mut lines = Vec::new();
        for (total, quantities, hour) in &orders {
            let order_id = Uuid::new_v4();
            for qty in quantities {
                lines.push(line(order_id, at(day, *hour, 0), *total, Some("Cash"), menu, "Mango", *qty));
            }
        }

        let report = sales_breakdown(&lines, &SalesFilter::default());

        let expected: i64 = orders
            .iter()
            .flat_map(|(_, quantities, _)| quantities)
            .map(|qty| *qty as i64)
            .sum();
        let daily: i64 = report.sales_by_day.iter().map(|p| p.cups).sum();
        prop_assert_eq!(daily, expected);
    }
}
