//! # Validation Error Types
//!
//! Input-validation failures raised before any store access.
//!
//! ## Error Flow
//! ```text
//! ValidationError (this module)
//!      │
//!      ▼
//! LedgerError (mostrador-ledger)  ← adds domain + storage variants
//!      │
//!      ▼
//! GUI layer renders a precise, per-field message
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, offending value)
//! 3. Errors are enum variants, never String

use thiserror::Error;

/// Input validation errors.
///
/// Raised by request validation before business logic runs; nothing has
/// touched the store when one of these is returned.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// A collection that must carry at least one element is empty.
    #[error("{field} must not be empty")]
    Empty { field: String },

    /// Value must be strictly positive.
    #[error("{field} must be positive (got {value})")]
    MustBePositive { field: String, value: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative (got {value})")]
    MustNotBeNegative { field: String, value: i64 },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g. invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
            value: -3,
        };
        assert_eq!(err.to_string(), "quantity must be positive (got -3)");

        let err = ValidationError::Empty {
            field: "lines".to_string(),
        };
        assert_eq!(err.to_string(), "lines must not be empty");
    }
}
