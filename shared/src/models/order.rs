//! Order lifecycle models
//!
//! Orders move pending -> ready -> served, but every transition is
//! permitted from every state; there is no guard. The one contract is
//! that each flag changes together with its timestamp: after any
//! transition `is_ready == ready_at.is_some()` and
//! `is_served == served_at.is_some()`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fulfillment progress, derived from the two flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderState {
    Pending,
    Ready,
    Served,
}

/// A customer order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub store_id: Option<Uuid>,
    /// Short label shown on the board (customer name or counter tag)
    pub name: String,
    pub customer_id: Option<Uuid>,
    /// Whole rupiah
    pub total_price: i64,
    pub payment_method_id: Option<Uuid>,
    pub is_ready: bool,
    pub is_served: bool,
    pub created_at: DateTime<Utc>,
    pub ready_at: Option<DateTime<Utc>>,
    pub served_at: Option<DateTime<Utc>>,
}

impl Order {
    pub fn state(&self) -> OrderState {
        if self.is_served {
            OrderState::Served
        } else if self.is_ready {
            OrderState::Ready
        } else {
            OrderState::Pending
        }
    }

    /// The flag/timestamp contract every transition must preserve
    pub fn flags_consistent(&self) -> bool {
        self.is_ready == self.ready_at.is_some() && self.is_served == self.served_at.is_some()
    }

    /// Any state -> READY. Clears served so a served order can be
    /// pulled back onto the board.
    pub fn mark_ready(&mut self, now: DateTime<Utc>) {
        self.is_ready = true;
        self.ready_at = Some(now);
        self.is_served = false;
        self.served_at = None;
    }

    /// Any state -> SERVED, back-filling ready_at if the order was
    /// never marked ready.
    pub fn mark_served(&mut self, now: DateTime<Utc>) {
        if !self.is_ready {
            self.is_ready = true;
            self.ready_at = Some(now);
        }
        self.is_served = true;
        self.served_at = Some(now);
    }

    /// Any state -> PENDING
    pub fn move_to_pending(&mut self) {
        self.is_ready = false;
        self.ready_at = None;
        self.is_served = false;
        self.served_at = None;
    }

    /// Drops the served mark only, leaving ready intact
    pub fn move_to_ready(&mut self) {
        self.is_served = false;
        self.served_at = None;
    }
}

/// Drop submitted lines with a non-positive quantity. Zero and
/// negative quantities are skipped silently, never rejected.
pub fn sanitize_items(items: &[(Uuid, i32)]) -> Vec<(Uuid, i32)> {
    items.iter().copied().filter(|(_, qty)| *qty > 0).collect()
}

/// Order total as the sum of quantity x unit price, in whole rupiah
pub fn order_total(lines: &[(i32, i64)]) -> i64 {
    lines
        .iter()
        .map(|(qty, price)| i64::from(*qty) * price)
        .sum()
}
