//! Validation utilities for the Shooties POS platform

/// Strip everything but digits so phone lookups ignore formatting
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Two phone numbers match when their digits match
pub fn phones_match(a: &str, b: &str) -> bool {
    let (a, b) = (normalize_phone(a), normalize_phone(b));
    !a.is_empty() && a == b
}

/// Order labels fit the board display
pub fn validate_order_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Order name cannot be empty");
    }
    if name.chars().count() > 20 {
        return Err("Order name must be at most 20 characters");
    }
    Ok(())
}
