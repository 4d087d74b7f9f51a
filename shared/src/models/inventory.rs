//! Stock ledger models
//!
//! The running balance on [`Ingredient`] is a derived cache over the
//! append-only [`StockEntry`] log. Entries always carry a positive
//! magnitude; the reason determines the sign applied to the balance.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An ingredient tracked in stock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: Uuid,
    pub name: String,
    /// Unit label: ml, gram, pcs, ...
    pub unit: String,
    /// Current stock level. Signed: sales may drive it negative,
    /// which is accepted behavior, not an error.
    pub quantity_in_stock: Decimal,
    pub low_stock_threshold: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Ingredient {
    pub fn is_low_stock(&self) -> bool {
        self.quantity_in_stock < self.low_stock_threshold
    }
}

/// Reason codes for ledger writes. Closed set at the write boundary;
/// reads go through the raw string so historical rows with reasons
/// outside this set are still replayable (see [`reason_direction`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockReason {
    ManualAdd,
    ManualDeduct,
    SaleDeduct,
    SaleCancellation,
}

impl StockReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockReason::ManualAdd => "manual_add",
            StockReason::ManualDeduct => "manual_deduct",
            StockReason::SaleDeduct => "sale_deduct",
            StockReason::SaleCancellation => "sale_cancellation",
        }
    }

    pub fn is_deduction(&self) -> bool {
        matches!(self, StockReason::ManualDeduct | StockReason::SaleDeduct)
    }
}

/// One immutable ledger row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockEntry {
    pub id: Uuid,
    pub ingredient_id: Uuid,
    /// Always a positive magnitude; the reason supplies the sign.
    pub quantity: Decimal,
    /// Stored as text so unknown historical reasons stay representable.
    pub reason: String,
    pub recorded_at: DateTime<Utc>,
}

impl StockEntry {
    /// Signed effect of this entry on the ingredient balance
    pub fn signed_change(&self) -> Decimal {
        self.quantity * Decimal::from(reason_direction(&self.reason))
    }
}

/// Sign convention for replaying ledger entries.
///
/// manual_add and sale_cancellation add stock, manual_deduct and
/// sale_deduct remove it. Anything else counts as an addition; that
/// fallback is deliberate and relied on by the snapshot reconstructor.
pub fn reason_direction(reason: &str) -> i64 {
    match reason {
        "manual_deduct" | "sale_deduct" => -1,
        _ => 1,
    }
}

/// Reconstruct a historical balance from the current one by reversing
/// every entry recorded after the snapshot instant.
///
/// `entries_after` must contain exactly the (reason, quantity) pairs
/// with `recorded_at > snapshot`. Inverse-consistent by construction:
/// `balance_at + net(entries_after) == current`.
pub fn balance_at(current: Decimal, entries_after: &[(String, Decimal)]) -> Decimal {
    let future_net: Decimal = entries_after
        .iter()
        .map(|(reason, qty)| *qty * Decimal::from(reason_direction(reason)))
        .sum();
    current - future_net
}

/// Net effect of a full ledger, for reconciliation against the stored
/// balance. Drift is reported, never silently corrected.
pub fn ledger_net(entries: &[(String, Decimal)]) -> Decimal {
    entries
        .iter()
        .map(|(reason, qty)| *qty * Decimal::from(reason_direction(reason)))
        .sum()
}
