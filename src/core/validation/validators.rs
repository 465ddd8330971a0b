//! Reusable field validators
//!
//! Each validator returns `Err(message)` describing the failure; the caller
//! attaches the field path.

use regex::Regex;
use std::sync::OnceLock;

/// Validator: phone number in E.164 shape (8 to 15 digits, optional leading `+`)
pub fn phone(value: &str) -> Result<(), String> {
    static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = PHONE_REGEX.get_or_init(|| {
        Regex::new(r"^\+?[1-9]\d{7,14}$").expect("phone regex is valid")
    });

    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    if regex.is_match(&compact) {
        Ok(())
    } else {
        Err(format!("'{}' is not a valid phone number", value))
    }
}

/// Validator: number must be finite and strictly positive
pub fn finite_positive(value: f64) -> Result<(), String> {
    if !value.is_finite() {
        Err("must be a finite number".to_string())
    } else if value <= 0.0 {
        Err(format!("must be greater than zero (value: {})", value))
    } else {
        Ok(())
    }
}

/// Validator: identifier must contain something other than whitespace
pub fn non_blank(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err("must not be blank".to_string())
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_accepts_rwandan_numbers() {
        assert!(phone("+250788123456").is_ok());
        assert!(phone("250788123456").is_ok());
        assert!(phone("+250 788 123 456").is_ok());
    }

    #[test]
    fn test_phone_rejects_garbage() {
        assert!(phone("call me").is_err());
        assert!(phone("+0123").is_err());
        assert!(phone("").is_err());
    }

    #[test]
    fn test_finite_positive() {
        assert!(finite_positive(0.5).is_ok());
        assert!(finite_positive(0.0).is_err());
        assert!(finite_positive(-3.0).is_err());
        assert!(finite_positive(f64::NAN).is_err());
        assert!(finite_positive(f64::INFINITY).is_err());
    }

    #[test]
    fn test_non_blank() {
        assert!(non_blank("T1").is_ok());
        assert!(non_blank("   ").is_err());
    }
}
