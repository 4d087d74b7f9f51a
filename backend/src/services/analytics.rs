//! Analytics service: sales and operations dashboards
//!
//! Everything here is keyed to Jakarta civil time: a sale at 01:00 UTC
//! lands on that day's 08:00 local bucket, and the stock snapshot is
//! taken at 23:00 local on the requested date. The services only fetch
//! rows; the aggregation rules (one filter driving every breakdown,
//! revenue from stored order totals, bucket and calendar membership)
//! are pure functions in `shared`.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::AppResult;
use shared::models::{balance_at, sales_breakdown, SaleLine, SalesBreakdown, SalesFilter};
use shared::types::{jakarta, local_date, local_time, DateRange, TimeDivision};

/// Analytics service
#[derive(Clone)]
pub struct AnalyticsService {
    db: PgPool,
}

/// Filters applied to the operations KPI order set
#[derive(Debug, Default)]
pub struct OperationsFilter {
    pub range: DateRange,
    pub menu_item_ids: Option<Vec<Uuid>>,
    pub time_division: Option<TimeDivision>,
}

/// Average fulfilment latencies in minutes; None when no order pair
/// carries both timestamps
#[derive(Debug, Serialize)]
pub struct FulfilmentStats {
    pub avg_ready_minutes: Option<f64>,
    pub avg_served_from_ready_minutes: Option<f64>,
    pub avg_served_minutes: Option<f64>,
    pub order_count: i64,
}

/// One ingredient's reconstructed end-of-day level
#[derive(Debug, Serialize)]
pub struct StockSnapshotRow {
    pub ingredient_id: Uuid,
    pub ingredient_name: String,
    pub unit: String,
    pub current_quantity: Decimal,
    pub snapshot_quantity: Decimal,
}

/// Operations dashboard payload
#[derive(Debug, Serialize)]
pub struct OperationsDashboard {
    pub fulfilment: FulfilmentStats,
    pub stock_date: NaiveDate,
    pub stock_snapshot: Vec<StockSnapshotRow>,
}

#[derive(Debug, FromRow)]
struct SaleLineRow {
    order_id: Uuid,
    created_at: DateTime<Utc>,
    order_total: i64,
    payment_method: Option<String>,
    menu_item_id: Uuid,
    menu_name: String,
    quantity: i32,
}

impl SaleLineRow {
    fn into_model(self) -> SaleLine {
        SaleLine {
            order_id: self.order_id,
            created_at: self.created_at,
            order_total: self.order_total,
            payment_method: self.payment_method,
            menu_item_id: self.menu_item_id,
            menu_name: self.menu_name,
            quantity: self.quantity,
        }
    }
}

#[derive(Debug, FromRow)]
struct OrderTimestamps {
    created_at: DateTime<Utc>,
    ready_at: Option<DateTime<Utc>>,
    served_at: Option<DateTime<Utc>>,
}

#[derive(Debug, FromRow)]
struct IngredientLevel {
    id: Uuid,
    name: String,
    unit: String,
    quantity_in_stock: Decimal,
}

#[derive(Debug, FromRow)]
struct EntryAfter {
    ingredient_id: Uuid,
    reason: String,
    quantity: Decimal,
}

impl AnalyticsService {
    /// Create a new AnalyticsService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Sales dashboard over an optional date range, menu subset and
    /// time-of-day bucket. One filtered line set feeds every breakdown,
    /// payment totals included. A range with no sales yields empty
    /// series, never an error.
    pub async fn sales_dashboard(&self, filter: SalesFilter) -> AppResult<SalesBreakdown> {
        let rows = sqlx::query_as::<_, SaleLineRow>(
            r#"
            SELECT o.id AS order_id, o.created_at, o.total_price AS order_total,
                   pm.name AS payment_method, oi.menu_item_id,
                   m.name AS menu_name, oi.quantity
            FROM order_items oi
            JOIN orders o ON o.id = oi.order_id
            JOIN menu_items m ON m.id = oi.menu_item_id
            LEFT JOIN payment_methods pm ON pm.id = o.payment_method_id
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let lines: Vec<SaleLine> = rows.into_iter().map(SaleLineRow::into_model).collect();
        Ok(sales_breakdown(&lines, &filter))
    }

    /// Operations dashboard: fulfilment latency averages over the
    /// filtered order set plus the stock levels reconstructed as of
    /// `stock_date` 23:00 Jakarta.
    pub async fn operations_dashboard(
        &self,
        filter: OperationsFilter,
        stock_date: NaiveDate,
    ) -> AppResult<OperationsDashboard> {
        let fulfilment = self.fulfilment_stats(&filter).await?;
        let stock_snapshot = self.stock_snapshot(stock_date).await?;

        Ok(OperationsDashboard {
            fulfilment,
            stock_date,
            stock_snapshot,
        })
    }

    /// KPI order set: orders in the date range, optionally narrowed to
    /// those containing one of the given menu items and to a
    /// time-of-day bucket, the same filters the sales dashboard takes.
    async fn fulfilment_stats(&self, filter: &OperationsFilter) -> AppResult<FulfilmentStats> {
        let orders = sqlx::query_as::<_, OrderTimestamps>(
            r#"
            SELECT o.created_at, o.ready_at, o.served_at
            FROM orders o
            WHERE ($1::uuid[] IS NULL OR EXISTS (
                SELECT 1 FROM order_items oi
                WHERE oi.order_id = o.id AND oi.menu_item_id = ANY($1)
            ))
            "#,
        )
        .bind(&filter.menu_item_ids)
        .fetch_all(&self.db)
        .await?;

        let orders: Vec<&OrderTimestamps> = orders
            .iter()
            .filter(|o| filter.range.contains(local_date(o.created_at)))
            .filter(|o| match filter.time_division {
                Some(division) => division.contains(local_time(o.created_at)),
                None => true,
            })
            .collect();

        let avg_minutes = |pairs: Vec<Duration>| {
            if pairs.is_empty() {
                None
            } else {
                let total: f64 = pairs.iter().map(|d| d.num_seconds() as f64).sum();
                Some(total / pairs.len() as f64 / 60.0)
            }
        };

        let ready: Vec<Duration> = orders
            .iter()
            .filter_map(|o| o.ready_at.map(|r| r - o.created_at))
            .collect();
        let served_from_ready: Vec<Duration> = orders
            .iter()
            .filter_map(|o| match (o.ready_at, o.served_at) {
                (Some(r), Some(s)) => Some(s - r),
                _ => None,
            })
            .collect();
        let served: Vec<Duration> = orders
            .iter()
            .filter_map(|o| o.served_at.map(|s| s - o.created_at))
            .collect();

        Ok(FulfilmentStats {
            avg_ready_minutes: avg_minutes(ready),
            avg_served_from_ready_minutes: avg_minutes(served_from_ready),
            avg_served_minutes: avg_minutes(served),
            order_count: orders.len() as i64,
        })
    }

    /// Reconstruct every ingredient's level at 23:00 Jakarta on the
    /// given date by walking the ledger back from the live quantity.
    async fn stock_snapshot(&self, stock_date: NaiveDate) -> AppResult<Vec<StockSnapshotRow>> {
        let cutoff_local = stock_date
            .and_time(NaiveTime::from_hms_opt(23, 0, 0).expect("valid snapshot time"));
        let cutoff: DateTime<Utc> = jakarta()
            .from_local_datetime(&cutoff_local)
            .single()
            .expect("fixed offset has no ambiguous times")
            .with_timezone(&Utc);

        let ingredients = sqlx::query_as::<_, IngredientLevel>(
            "SELECT id, name, unit, quantity_in_stock FROM ingredients ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        let entries = sqlx::query_as::<_, EntryAfter>(
            "SELECT ingredient_id, reason, quantity FROM stock_entries WHERE recorded_at > $1",
        )
        .bind(cutoff)
        .fetch_all(&self.db)
        .await?;

        let mut after: BTreeMap<Uuid, Vec<(String, Decimal)>> = BTreeMap::new();
        for entry in entries {
            after
                .entry(entry.ingredient_id)
                .or_default()
                .push((entry.reason, entry.quantity));
        }

        let rows = ingredients
            .into_iter()
            .map(|ing| {
                let later = after.remove(&ing.id).unwrap_or_default();
                StockSnapshotRow {
                    snapshot_quantity: balance_at(ing.quantity_in_stock, &later),
                    ingredient_id: ing.id,
                    ingredient_name: ing.name,
                    unit: ing.unit,
                    current_quantity: ing.quantity_in_stock,
                }
            })
            .collect();

        Ok(rows)
    }
}
