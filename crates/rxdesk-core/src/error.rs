//! # Error Types
//!
//! Domain-specific error types for rxdesk-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  rxdesk-core errors (this file)                                        │
//! │  ├── CoreError        - Business rule failures                         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  rxdesk-db errors                                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  rxdesk-sales errors                                                   │
//! │  └── SaleError        - Checkout, ledger and invoice failures          │
//! │                                                                         │
//! │  Web errors (apps/web)                                                 │
//! │  └── ApiError         - What the browser sees                          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → SaleError → ApiError → Browser    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Medicine id does not exist in the record store.
    ///
    /// ## When This Occurs
    /// - The medicine was deleted after the buy form was rendered
    /// - A hand-crafted form posted an unknown id
    #[error("Medicine not found: {0}")]
    MedicineNotFound(i64),

    /// Insufficient stock to complete sale.
    ///
    /// ## User Workflow
    /// ```text
    /// Buy form (Paracetamol qty: 5)
    ///      │
    ///      ▼
    /// Check stock: on hand = 3
    ///      │
    ///      ▼
    /// InsufficientStock { name: "Paracetamol", available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// UI shows: "Insufficient stock for Paracetamol: ..."
    /// ```
    #[error("Insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// Checkout was submitted without any medicine selected.
    #[error("Basket is empty")]
    EmptyBasket,

    /// Basket has exceeded maximum allowed lines.
    #[error("Basket cannot have more than {max} lines")]
    BasketTooLarge { max: usize },

    /// Medicines and quantities were supplied as parallel sequences of
    /// different length.
    #[error("Basket has {medicines} medicines but {quantities} quantities")]
    BasketLengthMismatch { medicines: usize, quantities: usize },

    /// Σ(price × quantity) does not fit in the money type.
    ///
    /// Only reachable with rows written around the validators.
    #[error("Basket total is too large")]
    TotalOverflow,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., price that is not a decimal number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
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
            name: "Paracetamol".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Paracetamol: available 3, requested 5"
        );

        let err = CoreError::BasketLengthMismatch {
            medicines: 2,
            quantities: 1,
        };
        assert_eq!(err.to_string(), "Basket has 2 medicines but 1 quantities");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::TooLong {
            field: "note".to_string(),
            max: 500,
        };
        assert_eq!(err.to_string(), "note must be at most 500 characters");
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
