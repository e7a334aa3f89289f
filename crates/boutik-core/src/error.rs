//! # Error Types
//!
//! Domain-specific error types for boutik-core.
//!
//! ## Error Hierarchy
//! ```text
//! boutik-core errors (this file)
//! ├── CoreError        - Business rule violations
//! └── ValidationError  - Input validation failures
//!
//! boutik-db errors (separate crate)
//! ├── DbError          - Database operation failures
//! └── OpError          - What the presentation layer sees
//!
//! Flow: ValidationError → CoreError → OpError → user-visible message
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product name, amounts, ...)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Per-line errors (`MalformedLine`, `ProductNotFound`,
/// `InsufficientStock`) are collected during batch parsing and never
/// abort the batch; operation-level errors (`InsufficientPayment`,
/// `OverPayment`, `NoValidLines`) abort the single operation that
/// raised them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Input that cannot be processed at all (empty product name,
    /// blank order batch).
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// An order-line token that does not follow `<name> x <qty>`.
    ///
    /// ## When This Occurs
    /// - Token has no `x` separator
    /// - Quantity part is not a non-negative integer
    #[error("Malformed line '{token}': {reason}")]
    MalformedLine { token: String, reason: String },

    /// No resolution tier produced a product for the given name.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Insufficient stock to sell the requested quantity.
    ///
    /// Raised at parse time against the loaded catalog, and again at
    /// commit time by the guarded stock decrement.
    #[error("Insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// Payment tendered is less than the sale total.
    #[error("Insufficient payment: {shortfall_cents} cents short")]
    InsufficientPayment { shortfall_cents: i64 },

    /// A credit payment larger than the remaining balance. The excess
    /// is never partially applied.
    #[error("Payment of {amount_cents} cents exceeds remaining balance of {balance_cents} cents")]
    OverPayment {
        amount_cents: i64,
        balance_cents: i64,
    },

    /// A non-empty batch in which every line was rejected.
    #[error("No valid order lines")]
    NoValidLines,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when user input doesn't meet field-level requirements,
/// before any business logic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            name: "Riz 5kg".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Riz 5kg: available 3, requested 5"
        );

        let err = CoreError::OverPayment {
            amount_cents: 15_000,
            balance_cents: 10_000,
        };
        assert_eq!(
            err.to_string(),
            "Payment of 15000 cents exceeds remaining balance of 10000 cents"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
