//! Common validation utilities.

use std::borrow::Borrow;

use validator::ValidationError;

/// Validates that a foreign key points at a selected record.
///
/// Identifiers are assigned by the remote store and start at 1, so 0 means
/// "nothing selected yet".
pub fn validate_reference(id: impl Borrow<i64>) -> Result<(), ValidationError> {
    if *id.borrow() >= 1 {
        Ok(())
    } else {
        let mut err = ValidationError::new("reference_required");
        err.message = Some("A selection is required".into());
        Err(err)
    }
}

/// Validates that a display order is at least 1.
///
/// Accepts the value or a reference so it can back a derived `custom` rule.
pub fn validate_order(order: impl Borrow<i64>) -> Result<(), ValidationError> {
    if *order.borrow() >= 1 {
        Ok(())
    } else {
        let mut err = ValidationError::new("order_range");
        err.message = Some("Order must be at least 1".into());
        Err(err)
    }
}

/// Matches `value` exactly against a closed set of literals.
///
/// Returns the index of the matching literal.
pub fn parse_literal(value: &str, allowed: &[&str]) -> Result<usize, ValidationError> {
    match allowed.iter().position(|literal| *literal == value) {
        Some(index) => Ok(index),
        None => {
            let mut err = ValidationError::new("invalid_literal");
            err.message = Some(format!("Must be one of: {}", allowed.join(", ")).into());
            err.add_param("value".into(), &value);
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_reference() {
        assert!(validate_reference(1i64).is_ok());
        assert!(validate_reference(42i64).is_ok());
        assert!(validate_reference(0i64).is_err());
        assert!(validate_reference(-3i64).is_err());
    }

    #[test]
    fn test_validate_reference_error_message() {
        let err = validate_reference(0i64).unwrap_err();
        assert_eq!(err.code, "reference_required");
        assert_eq!(
            err.message.unwrap().to_string(),
            "A selection is required"
        );
    }

    #[test]
    fn test_validate_order() {
        assert!(validate_order(1i64).is_ok());
        assert!(validate_order(99i64).is_ok());
        assert!(validate_order(0i64).is_err());
        assert!(validate_order(-1i64).is_err());
    }

    #[test]
    fn test_validators_accept_references() {
        let order = 3i64;
        assert!(validate_order(&order).is_ok());
        assert!(validate_reference(&0i64).is_err());
    }

    #[test]
    fn test_validate_order_error_message() {
        let err = validate_order(0i64).unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Order must be at least 1"
        );
    }

    #[test]
    fn test_parse_literal() {
        let allowed = ["Active", "Inactive"];
        assert_eq!(parse_literal("Active", &allowed).unwrap(), 0);
        assert_eq!(parse_literal("Inactive", &allowed).unwrap(), 1);
    }

    #[test]
    fn test_parse_literal_is_case_sensitive() {
        let allowed = ["ACTIVE", "INACTIVE"];
        assert!(parse_literal("active", &allowed).is_err());
        assert!(parse_literal("Pending", &allowed).is_err());
        assert!(parse_literal("", &allowed).is_err());
    }

    #[test]
    fn test_parse_literal_error_message() {
        let err = parse_literal("Paused", &["Active", "Inactive"]).unwrap_err();
        assert_eq!(err.code, "invalid_literal");
        assert_eq!(
            err.message.unwrap().to_string(),
            "Must be one of: Active, Inactive"
        );
    }
}
