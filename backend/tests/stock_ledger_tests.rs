//! Stock ledger tests
//!
//! Tests for the sign convention, recipe consumption and ledger replay:
//! entries carry positive magnitudes, reasons carry direction, and a
//! sale followed by its cancellation nets to zero.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::models::{
    consumption, ledger_net, reason_direction, Ingredient, StockEntry, StockReason,
};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn entry(reason: &str, quantity: &str) -> StockEntry {
        StockEntry {
            id: Uuid::new_v4(),
            ingredient_id: Uuid::new_v4(),
            quantity: dec(quantity),
            reason: reason.to_string(),
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn additions_have_positive_direction() {
        assert_eq!(reason_direction("manual_add"), 1);
        assert_eq!(reason_direction("sale_cancellation"), 1);
    }

    #[test]
    fn deductions_have_negative_direction() {
        assert_eq!(reason_direction("manual_deduct"), -1);
        assert_eq!(reason_direction("sale_deduct"), -1);
    }

    /// Historical rows with reasons outside the current set replay as
    /// additions rather than breaking the import
    #[test]
    fn unknown_reason_counts_as_addition() {
        assert_eq!(reason_direction("initial_import"), 1);
        assert_eq!(reason_direction(""), 1);
    }

    #[test]
    fn reason_codes_round_trip_as_snake_case() {
        assert_eq!(StockReason::ManualAdd.as_str(), "manual_add");
        assert_eq!(StockReason::ManualDeduct.as_str(), "manual_deduct");
        assert_eq!(StockReason::SaleDeduct.as_str(), "sale_deduct");
        assert_eq!(StockReason::SaleCancellation.as_str(), "sale_cancellation");
    }

    #[test]
    fn deduction_classification() {
        assert!(StockReason::ManualDeduct.is_deduction());
        assert!(StockReason::SaleDeduct.is_deduction());
        assert!(!StockReason::ManualAdd.is_deduction());
        assert!(!StockReason::SaleCancellation.is_deduction());
    }

    #[test]
    fn signed_change_applies_direction_to_magnitude() {
        assert_eq!(entry("sale_deduct", "250").signed_change(), dec("-250"));
        assert_eq!(entry("manual_add", "250").signed_change(), dec("250"));
    }

    /// Two cups of a smoothie using 125 ml of mango each deduct 250 ml
    #[test]
    fn recipe_consumption_scales_with_quantity() {
        assert_eq!(consumption(2, dec("125")), dec("250"));
        assert_eq!(consumption(1, dec("0.5")), dec("0.5"));
        assert_eq!(consumption(3, dec("33.33")), dec("99.99"));
    }

    /// Two lines sharing an ingredient each post their own entry:
    /// 2 cups at 100 ml plus 1 cup at 50 ml is two entries netting
    /// a 250 ml deduction
    #[test]
    fn shared_ingredient_gets_one_entry_per_line() {
        let postings = vec![
            ("sale_deduct".to_string(), consumption(2, dec("100"))),
            ("sale_deduct".to_string(), consumption(1, dec("50"))),
        ];

        assert_eq!(postings.len(), 2);
        assert_eq!(ledger_net(&postings), dec("-250"));
    }

    /// A sale deduction followed by its cancellation restores the
    /// balance exactly
    #[test]
    fn sale_then_cancellation_nets_zero() {
        let ledger = vec![
            ("sale_deduct".to_string(), dec("250")),
            ("sale_cancellation".to_string(), dec("250")),
        ];
        assert_eq!(ledger_net(&ledger), Decimal::ZERO);
    }

    #[test]
    fn ledger_net_mixes_directions() {
        let ledger = vec![
            ("manual_add".to_string(), dec("1000")),
            ("sale_deduct".to_string(), dec("250")),
            ("manual_deduct".to_string(), dec("100")),
            ("sale_cancellation".to_string(), dec("250")),
        ];
        assert_eq!(ledger_net(&ledger), dec("900"));
    }

    /// Nothing floors the balance: deductions beyond stock go negative
    #[test]
    fn net_may_be_negative() {
        let ledger = vec![
            ("manual_add".to_string(), dec("100")),
            ("sale_deduct".to_string(), dec("250")),
        ];
        assert_eq!(ledger_net(&ledger), dec("-150"));
    }

    #[test]
    fn empty_ledger_nets_zero() {
        assert_eq!(ledger_net(&[]), Decimal::ZERO);
    }

    /// Low stock is strictly below the threshold; sitting exactly on
    /// it is not low
    #[test]
    fn low_stock_is_strictly_below_threshold() {
        let mut mango = Ingredient {
            id: Uuid::new_v4(),
            name: "Mango".to_string(),
            unit: "ml".to_string(),
            quantity_in_stock: dec("10"),
            low_stock_threshold: dec("10"),
            created_at: Utc::now(),
        };
        assert!(!mango.is_low_stock());

        mango.quantity_in_stock = dec("9.99");
        assert!(mango.is_low_stock());

        // Negative balances are always low
        mango.quantity_in_stock = dec("-5");
        assert!(mango.is_low_stock());
    }
}

// ============================================================================
// Property Tests
// ============================================================================

fn quantity_strategy() -> impl Strategy<Value = Decimal> {
    // Magnitudes in the range real postings use: 0.01 .. 10000.00
    (1u64..1_000_000).prop_map(|cents| Decimal::new(cents as i64, 2))
}

fn reason_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("manual_add".to_string()),
        Just("manual_deduct".to_string()),
        Just("sale_deduct".to_string()),
        Just("sale_cancellation".to_string()),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The net of any ledger equals additions minus deductions
    #[test]
    fn prop_net_is_additions_minus_deductions(
        entries in prop::collection::vec((reason_strategy(), quantity_strategy()), 0..30)
    ) {
        let additions: Decimal = entries
            .iter()
            .filter(|(reason, _)| reason_direction(reason) == 1)
            .map(|(_, qty)| *qty)
            .sum();
        let deductions: Decimal = entries
            .iter()
            .filter(|(reason, _)| reason_direction(reason) == -1)
            .map(|(_, qty)| *qty)
            .sum();

        prop_assert_eq!(ledger_net(&entries), additions - deductions);
    }

    /// Replaying a ledger and then its mirror (each deduction answered
    /// by a matching addition) always nets zero
    #[test]
    fn prop_mirrored_postings_cancel(
        quantities in prop::collection::vec(quantity_strategy(), 1..20)
    ) {
        let mut ledger = Vec::new();
        for qty in &quantities {
            ledger.push(("sale_deduct".to_string(), *qty));
        }
        for qty in &quantities {
            ledger.push(("sale_cancellation".to_string(), *qty));
        }

        prop_assert_eq!(ledger_net(&ledger), Decimal::ZERO);
    }

    /// Direction is a pure function of the reason string
    #[test]
    fn prop_direction_is_sign_only(reason in reason_strategy(), qty in quantity_strategy()) {
        let direction = reason_direction(&reason);
        prop_assert!(direction == 1 || direction == -1);
        prop_assert_eq!((qty * Decimal::from(direction)).abs(), qty);
    }
}
