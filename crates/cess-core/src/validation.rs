//! # Validation Module
//!
//! Input validation for request and rule-table values.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP API (cess-api)                                          │
//! │  ├── Type/shape checks (JSON deserialization)                          │
//! │  └── Rejects malformed bodies before the core is called                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Newtype construction (THIS MODULE)                           │
//! │  ├── HSN code / pattern format                                         │
//! │  ├── State and currency codes                                          │
//! │  └── Rate ranges                                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Tax Calculator                                               │
//! │  └── Re-checks numeric ranges (never clamps)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cess_core::validation::{validate_hsn_code, validate_non_negative};
//! use rust_decimal::Decimal;
//!
//! validate_hsn_code("24022010").unwrap();
//! assert!(validate_non_negative("quantity", Decimal::NEGATIVE_ONE).is_err());
//! ```

use rust_decimal::Decimal;

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Shortest HSN code accepted on a line item (heading level).
pub const MIN_HSN_CODE_LEN: usize = 4;

/// Shortest rule pattern accepted (chapter level).
pub const MIN_HSN_PATTERN_LEN: usize = 2;

/// Longest HSN code (tariff item level).
pub const MAX_HSN_LEN: usize = 8;

// =============================================================================
// Code Validators
// =============================================================================

fn validate_digits(field: &str, value: &str, min: usize, max: usize) -> ValidationResult<()> {
    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::invalid_format(field, "must contain only digits"));
    }

    if value.len() < min || value.len() > max {
        return Err(ValidationError::invalid_format(
            field,
            format!("must be {} to {} digits", min, max),
        ));
    }

    Ok(())
}

/// Validates an HSN code on a line item.
///
/// ## Rules
/// - Digits only
/// - 4 to 8 digits
///
/// ## Example
/// ```rust
/// use cess_core::validation::validate_hsn_code;
///
/// assert!(validate_hsn_code("2402").is_ok());
/// assert!(validate_hsn_code("24").is_err());
/// assert!(validate_hsn_code("24AB").is_err());
/// ```
pub fn validate_hsn_code(code: &str) -> ValidationResult<()> {
    validate_digits("hsn_code", code, MIN_HSN_CODE_LEN, MAX_HSN_LEN)
}

/// Validates an HSN rule pattern and returns its digit prefix.
///
/// ## Rules
/// - 2 to 8 digits
/// - An optional trailing `*` is accepted and stripped (`"2402*"` is the
///   same prefix as `"2402"`)
pub fn validate_hsn_pattern(pattern: &str) -> ValidationResult<&str> {
    let pattern = pattern.trim();
    let digits = pattern.strip_suffix('*').unwrap_or(pattern);
    validate_digits("hsn_pattern", digits, MIN_HSN_PATTERN_LEN, MAX_HSN_LEN)?;
    Ok(digits)
}

/// Validates a state code.
///
/// ## Rules
/// - Exactly two ASCII letters or digits: alpha codes (`MH`, `DL`) and GST
///   numeric codes (`27`, `07`) are both accepted
pub fn validate_state_code(code: &str) -> ValidationResult<()> {
    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "state".to_string(),
        });
    }

    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::invalid_format(
            "state",
            "must be a two-character state code",
        ));
    }

    Ok(())
}

/// Validates an ISO-4217 style currency code (three ASCII letters).
pub fn validate_currency_code(code: &str) -> ValidationResult<()> {
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::invalid_format(
            "currency",
            "must be a three-letter currency code",
        ));
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates that a quantity, price or amount is not negative.
///
/// ## Example
/// ```rust
/// use cess_core::validation::validate_non_negative;
/// use rust_decimal::Decimal;
///
/// assert!(validate_non_negative("unit_price", Decimal::ZERO).is_ok());
/// assert!(validate_non_negative("unit_price", Decimal::new(-1, 2)).is_err());
/// ```
pub fn validate_non_negative(field: &str, value: Decimal) -> ValidationResult<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::negative(field));
    }

    Ok(())
}

/// Validates that a value is strictly positive.
pub fn validate_positive(field: &str, value: Decimal) -> ValidationResult<()> {
    if value <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a percentage rate in [0, 100].
///
/// ## Rules
/// - GST slabs are 0% to 28% in practice; anything above 100% is rejected
pub fn validate_percentage(field: &str, pct: Decimal) -> ValidationResult<()> {
    if pct < Decimal::ZERO || pct > Decimal::ONE_HUNDRED {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: "0".to_string(),
            max: "100".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_validate_hsn_code() {
        assert!(validate_hsn_code("2402").is_ok());
        assert!(validate_hsn_code("100110").is_ok());
        assert!(validate_hsn_code("24022010").is_ok());

        assert!(validate_hsn_code("").is_err());
        assert!(validate_hsn_code("240").is_err());
        assert!(validate_hsn_code("240220101").is_err());
        assert!(validate_hsn_code("24 02").is_err());
    }

    #[test]
    fn test_validate_hsn_pattern() {
        assert_eq!(validate_hsn_pattern("24").unwrap(), "24");
        assert_eq!(validate_hsn_pattern("2402*").unwrap(), "2402");
        assert_eq!(validate_hsn_pattern(" 1001 ").unwrap(), "1001");

        assert!(validate_hsn_pattern("*").is_err());
        assert!(validate_hsn_pattern("2").is_err());
        assert!(validate_hsn_pattern("24*02").is_err());
    }

    #[test]
    fn test_validate_state_code() {
        assert!(validate_state_code("MH").is_ok());
        assert!(validate_state_code("27").is_ok());
        assert!(validate_state_code("").is_err());
        assert!(validate_state_code("MAH").is_err());
        assert!(validate_state_code("M-").is_err());
    }

    #[test]
    fn test_validate_currency_code() {
        assert!(validate_currency_code("INR").is_ok());
        assert!(validate_currency_code("usd").is_ok());
        assert!(validate_currency_code("RS").is_err());
        assert!(validate_currency_code("IN1").is_err());
    }

    #[test]
    fn test_validate_numbers() {
        assert!(validate_non_negative("quantity", dec!(0)).is_ok());
        assert!(validate_non_negative("quantity", dec!(-0.01)).is_err());
        assert!(validate_positive("unit_count", dec!(1000)).is_ok());
        assert!(validate_positive("unit_count", dec!(0)).is_err());
    }

    #[test]
    fn test_validate_percentage() {
        assert!(validate_percentage("gst_rate", dec!(0)).is_ok());
        assert!(validate_percentage("gst_rate", dec!(28)).is_ok());
        assert!(validate_percentage("gst_rate", dec!(100)).is_ok());
        assert!(validate_percentage("gst_rate", dec!(100.01)).is_err());
        assert!(validate_percentage("gst_rate", dec!(-1)).is_err());
    }
}
