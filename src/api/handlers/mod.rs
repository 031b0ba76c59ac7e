//! API handlers and shared validation helpers.
//!
//! Request shape rules live here so every handler applies the same checks
//! before touching the store.

pub mod auth;
pub mod health;

use auth::codes::{CODE_MAX, CODE_MIN};
use regex::Regex;

/// IC numbers are exactly 12 ASCII digits.
pub fn valid_ic_number(ic_number: &str) -> bool {
    Regex::new(r"^\d{12}$").is_ok_and(|re| re.is_match(ic_number))
}

/// Full names are 10 to 50 characters, letters and spaces only.
pub fn valid_full_name(full_name: &str) -> bool {
    (10..=50).contains(&full_name.chars().count())
        && Regex::new(r"^[a-zA-Z\s]+$").is_ok_and(|re| re.is_match(full_name))
}

/// Basic shape check on an already-normalized email.
pub fn valid_email(email: &str) -> bool {
    (4..=50).contains(&email.len())
        && Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

/// Display phone numbers arrive as `+60 XX XXX XXXX`, spaces included.
pub fn valid_display_phone(display_phone: &str) -> bool {
    Regex::new(r"^\+60 \d{2} \d{3} \d{4}$").is_ok_and(|re| re.is_match(display_phone))
}

/// PINs are six digits.
#[must_use]
pub const fn valid_pin(pin: u32) -> bool {
    pin >= 100_000 && pin <= 999_999
}

/// Codes are four digits.
#[must_use]
pub const fn valid_code(code: i32) -> bool {
    code >= CODE_MIN && code <= CODE_MAX
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ic_number_must_be_twelve_digits() {
        assert!(valid_ic_number("900101105678"));
        assert!(!valid_ic_number("90010110567"));
        assert!(!valid_ic_number("9001011056789"));
        assert!(!valid_ic_number("90010110567a"));
        assert!(!valid_ic_number(""));
    }

    #[test]
    fn full_name_accepts_letters_and_spaces() {
        assert!(valid_full_name("Alice Binti Ahmad"));
        assert!(!valid_full_name("Alice2 Ahmad"));
        // Too short
        assert!(!valid_full_name("Alice"));
        // Too long
        assert!(!valid_full_name(&"a".repeat(51)));
    }

    #[test]
    fn email_requires_basic_shape() {
        assert!(valid_email("a@b.co"));
        assert!(valid_email("name.surname@example.com"));
        assert!(!valid_email("not-an-email"));
        assert!(!valid_email("missing-domain@"));
        assert!(!valid_email("a@b"));
        // Over the length cap
        let long = format!("{}@example.com", "a".repeat(50));
        assert!(!valid_email(&long));
    }

    #[test]
    fn display_phone_requires_malaysian_format() {
        assert!(valid_display_phone("+60 12 345 6789"));
        assert!(!valid_display_phone("+60123456789"));
        assert!(!valid_display_phone("012 345 6789"));
        assert!(!valid_display_phone("+60 12 345 678"));
    }

    #[test]
    fn pin_must_be_six_digits() {
        assert!(valid_pin(100_000));
        assert!(valid_pin(999_999));
        assert!(!valid_pin(99_999));
        assert!(!valid_pin(1_000_000));
    }

    #[test]
    fn code_must_be_four_digits() {
        assert!(valid_code(1000));
        assert!(valid_code(9999));
        assert!(!valid_code(999));
        assert!(!valid_code(10_000));
        assert!(!valid_code(0));
    }
}
