//! Customer matching tests
//!
//! Phone lookups ignore formatting: only the digits decide whether two
//! numbers are the same member.

use proptest::prelude::*;

use shared::validation::{normalize_phone, phones_match};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn normalize_strips_formatting() {
        assert_eq!(normalize_phone("0812-3456-789"), "08123456789");
        assert_eq!(normalize_phone("+62 812 3456 789"), "628123456789");
        assert_eq!(normalize_phone("(0812) 3456.789"), "08123456789");
    }

    #[test]
    fn normalize_of_no_digits_is_empty() {
        assert_eq!(normalize_phone("abc- ()"), "");
        assert_eq!(normalize_phone(""), "");
    }

    #[test]
    fn differently_formatted_numbers_match() {
        assert!(phones_match("0812-3456-789", "0812 3456 789"));
        assert!(phones_match("08123456789", "0812.3456.789"));
    }

    #[test]
    fn different_digits_do_not_match() {
        assert!(!phones_match("08123456789", "08123456780"));
    }

    /// Country-code and local forms are different digit strings, so
    /// they are different members
    #[test]
    fn country_code_form_is_distinct() {
        assert!(!phones_match("+628123456789", "08123456789"));
    }

    /// Two digit-free strings never match, even when equal
    #[test]
    fn empty_digits_never_match() {
        assert!(!phones_match("", ""));
        assert!(!phones_match("---", "---"));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

fn digits_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec(0u8..10, 6..13)
        .prop_map(|ds| ds.into_iter().map(|d| char::from(b'0' + d)).collect())
}

fn noise_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec(prop_oneof![Just('-'), Just(' '), Just('.'), Just('(')], 0..6)
        .prop_map(|cs| cs.into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Normalization is idempotent
    #[test]
    fn prop_normalize_idempotent(phone in "[0-9 ()+.-]{0,20}") {
        let once = normalize_phone(&phone);
        prop_assert_eq!(normalize_phone(&once), once);
    }

    /// Inserting formatting noise never changes the match result
    #[test]
    fn prop_noise_does_not_affect_matching(
        digits in digits_strategy(),
        prefix in noise_strategy(),
        infix in noise_strategy()
    ) {
        let mid = digits.len() / 2;
        let decorated = format!("{}{}{}{}", prefix, &digits[..mid], infix, &digits[mid..]);

        prop_assert!(phones_match(&decorated, &digits));
    }

    /// Matching is symmetric
    #[test]
    fn prop_match_symmetric(a in "[0-9 -]{0,15}", b in "[0-9 -]{0,15}") {
        prop_assert_eq!(phones_match(&a, &b), phones_match(&b, &a));
    }
}
