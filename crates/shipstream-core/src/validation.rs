//! Validation utilities.

use crate::{FieldError, ShipstreamError};
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a `ShipstreamError` on failure.
    fn validate_request(&self) -> Result<(), ShipstreamError> {
        self.validate().map_err(validation_errors_to_shipstream_error)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Converts `validator::ValidationErrors` to `ShipstreamError`.
#[must_use]
pub fn validation_errors_to_shipstream_error(errors: ValidationErrors) -> ShipstreamError {
    let field_errors: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: (*field).to_string(),
                message: error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), |m| m.to_string()),
                code: error.code.to_string(),
            })
        })
        .collect();

    let message = field_errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ");

    ShipstreamError::Validation(message)
}

/// Common validation functions.
pub mod rules {
    use crate::domain::MAX_PATTERN_LEN;
    use uuid::Uuid;
    use validator::ValidationError;

    /// Validates that a string is not blank (not empty after trimming).
    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new("not_blank"));
        }
        Ok(())
    }

    /// Validates that a tenant id is a syntactically well-formed UUID,
    /// not merely length-checked.
    pub fn valid_tenant_id(value: &str) -> Result<(), ValidationError> {
        Uuid::parse_str(value).map_err(|_| ValidationError::new("tenant_id_not_uuid"))?;
        Ok(())
    }

    /// Validates a search pattern: non-blank and length-bounded.
    pub fn valid_pattern(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new("pattern_blank"));
        }
        if value.len() > MAX_PATTERN_LEN {
            return Err(ValidationError::new("pattern_too_long"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::rules::*;
    use crate::domain::MAX_PATTERN_LEN;

    #[test]
    fn test_not_blank() {
        assert!(not_blank("hello").is_ok());
        assert!(not_blank("   ").is_err());
        assert!(not_blank("").is_err());
    }

    #[test]
    fn test_valid_tenant_id() {
        assert!(valid_tenant_id("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(valid_tenant_id("not-a-uuid").is_err());
        // Length alone is not enough; 36 chars of garbage must still fail.
        assert!(valid_tenant_id("zzzzzzzz-zzzz-zzzz-zzzz-zzzzzzzzzzzz").is_err());
    }

    #[test]
    fn test_valid_pattern() {
        assert!(valid_pattern("123456789").is_ok());
        assert!(valid_pattern("").is_err());
        assert!(valid_pattern("  ").is_err());
        assert!(valid_pattern(&"9".repeat(MAX_PATTERN_LEN + 1)).is_err());
    }
}
