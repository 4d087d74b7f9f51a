//! Recipe arithmetic

use rust_decimal::Decimal;

/// Stock consumed by `quantity` units of a menu item for one recipe
/// edge. Recipes are per-unit, so two cups at 125 ml each cost 250 ml.
pub fn consumption(quantity: i32, amount_per_unit: Decimal) -> Decimal {
    Decimal::from(quantity) * amount_per_unit
}
