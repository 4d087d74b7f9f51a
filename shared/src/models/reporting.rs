//! Sales dashboard aggregation rules
//!
//! The dashboard is computed over order lines joined with their order.
//! One filter selects the line set, and all four breakdowns come from
//! that same set: a time-of-day or menu filter narrows the payment
//! totals exactly as it narrows the daily series. Revenue is always
//! the stored order total, credited once per order, so editing a menu
//! price after a sale never rewrites history.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::types::{local_date, local_time, DateRange, TimeDivision};

/// One order line joined with its order, the unit the sales dashboard
/// aggregates over
#[derive(Debug, Clone)]
pub struct SaleLine {
    pub order_id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Stored total of the whole order, in rupiah
    pub order_total: i64,
    pub payment_method: Option<String>,
    pub menu_item_id: Uuid,
    pub menu_name: String,
    pub quantity: i32,
}

/// Filters accepted by the sales dashboard. An order line survives
/// only if it passes every bound at once.
#[derive(Debug, Clone, Default)]
pub struct SalesFilter {
    pub range: DateRange,
    pub menu_item_ids: Option<Vec<Uuid>>,
    pub time_division: Option<TimeDivision>,
}

impl SalesFilter {
    pub fn matches(&self, line: &SaleLine) -> bool {
        if !self.range.contains(local_date(line.created_at)) {
            return false;
        }
        if let Some(ids) = &self.menu_item_ids {
            if !ids.is_empty() && !ids.contains(&line.menu_item_id) {
                return false;
            }
        }
        if let Some(division) = self.time_division {
            if !division.contains(local_time(line.created_at)) {
                return false;
            }
        }
        true
    }
}

/// One day of the sales series
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub revenue: i64,
    pub cups: i64,
}

/// One menu item's slice of the sales mix
#[derive(Debug, Clone, Serialize)]
pub struct MenuShare {
    pub menu_item_id: Uuid,
    pub menu_name: String,
    pub cups: i64,
    pub share_percent: f64,
}

/// Takings per payment method over the filtered orders
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PaymentMethodTotal {
    pub payment_method: String,
    pub order_count: i64,
    pub revenue: i64,
}

/// Cups sold in one time-of-day bucket
#[derive(Debug, Clone, Serialize)]
pub struct TimeDivisionCount {
    pub division: TimeDivision,
    pub label: &'static str,
    pub cups: i64,
}

/// Sales dashboard payload
#[derive(Debug, Serialize)]
pub struct SalesBreakdown {
    pub sales_by_day: Vec<DailyPoint>,
    pub menu_share: Vec<MenuShare>,
    pub payment_methods: Vec<PaymentMethodTotal>,
    pub time_divisions: Vec<TimeDivisionCount>,
}

/// Compute every aggregate from the same filtered line set. No sales
/// in the filter window means empty series, never an error.
pub fn sales_breakdown(lines: &[SaleLine], filter: &SalesFilter) -> SalesBreakdown {
    let lines: Vec<&SaleLine> = lines.iter().filter(|line| filter.matches(line)).collect();
    let orders = distinct_orders(&lines);

    SalesBreakdown {
        sales_by_day: daily_series(&lines, &orders),
        menu_share: menu_share(&lines),
        payment_methods: payment_totals(&orders),
        time_divisions: time_division_counts(&lines),
    }
}

/// One representative line per order among the filtered lines. Order
/// fields (total, payment method, created_at) are identical across an
/// order's lines, so any representative works.
fn distinct_orders<'a>(lines: &[&'a SaleLine]) -> Vec<&'a SaleLine> {
    let mut seen: BTreeMap<Uuid, &SaleLine> = BTreeMap::new();
    for line in lines {
        seen.entry(line.order_id).or_insert(line);
    }
    seen.into_values().collect()
}

/// Daily series over the days that actually saw sales, in calendar
/// order. Revenue credits each surviving order's stored total to its
/// day once; cups sum the surviving lines.
fn daily_series(lines: &[&SaleLine], orders: &[&SaleLine]) -> Vec<DailyPoint> {
    let mut by_day: BTreeMap<NaiveDate, (i64, i64)> = BTreeMap::new();

    for order in orders {
        by_day.entry(local_date(order.created_at)).or_insert((0, 0)).0 += order.order_total;
    }
    for line in lines {
        by_day.entry(local_date(line.created_at)).or_insert((0, 0)).1 += line.quantity as i64;
    }

    by_day
        .into_iter()
        .map(|(date, (revenue, cups))| DailyPoint {
            date,
            revenue,
            cups,
        })
        .collect()
}

fn menu_share(lines: &[&SaleLine]) -> Vec<MenuShare> {
    let mut by_menu: BTreeMap<Uuid, (String, i64)> = BTreeMap::new();
    for line in lines {
        let entry = by_menu
            .entry(line.menu_item_id)
            .or_insert_with(|| (line.menu_name.clone(), 0));
        entry.1 += line.quantity as i64;
    }

    let total_cups: i64 = by_menu.values().map(|(_, cups)| cups).sum();

    let mut shares: Vec<MenuShare> = by_menu
        .into_iter()
        .map(|(menu_item_id, (menu_name, cups))| MenuShare {
            menu_item_id,
            menu_name,
            cups,
            share_percent: if total_cups == 0 {
                0.0
            } else {
                cups as f64 * 100.0 / total_cups as f64
            },
        })
        .collect();

    shares.sort_by(|a, b| b.cups.cmp(&a.cups).then(a.menu_name.cmp(&b.menu_name)));
    shares
}

/// Order-level takings per payment method, over the same filtered
/// order set as the daily series. Orders without a payment method are
/// left out of this breakdown.
fn payment_totals(orders: &[&SaleLine]) -> Vec<PaymentMethodTotal> {
    let mut by_method: BTreeMap<String, (i64, i64)> = BTreeMap::new();
    for order in orders {
        if let Some(method) = &order.payment_method {
            let entry = by_method.entry(method.clone()).or_insert((0, 0));
            entry.0 += 1;
            entry.1 += order.order_total;
        }
    }

    let mut totals: Vec<PaymentMethodTotal> = by_method
        .into_iter()
        .map(|(payment_method, (order_count, revenue))| PaymentMethodTotal {
            payment_method,
            order_count,
            revenue,
        })
        .collect();

    totals.sort_by(|a, b| {
        b.revenue
            .cmp(&a.revenue)
            .then(a.payment_method.cmp(&b.payment_method))
    });
    totals
}

fn time_division_counts(lines: &[&SaleLine]) -> Vec<TimeDivisionCount> {
    TimeDivision::ALL
        .iter()
        .map(|division| TimeDivisionCount {
            division: *division,
            label: division.label(),
            cups: lines
                .iter()
                .filter(|line| division.contains(local_time(line.created_at)))
                .map(|line| line.quantity as i64)
                .sum(),
        })
        .collect()
}
