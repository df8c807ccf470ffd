//! # Validation Module
//!
//! Input validation for the web forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTML form (min="0", required)                                │
//! │  └── Convenience only, trivially bypassed                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Web handler (Rust)                                           │
//! │  └── THIS MODULE: field rules for Add / Restock / Buy                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Sale orchestrator                                            │
//! │  └── Existence and stock checks against the record store               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 4: SQLite                                                       │
//! │  └── NOT NULL constraints only                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The record store itself accepts any values, so everything that must hold
//! is checked here or in the orchestrator.

use crate::error::ValidationError;
use crate::types::NewMedicine;
use crate::{MAX_LINE_QUANTITY, MAX_NOTE_LENGTH, MAX_PRICE_CENTS, MAX_STOCK_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LENGTH: usize = 200;
const MAX_DETAIL_LENGTH: usize = 200;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a medicine name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 200 characters
///
/// ## Example
/// ```rust
/// use rxdesk_core::validation::validate_medicine_name;
///
/// assert!(validate_medicine_name("Amoxicillin").is_ok());
/// assert!(validate_medicine_name("   ").is_err());
/// ```
pub fn validate_medicine_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(())
}

/// Validates an optional detail field (dosage, manufacturer). Empty is fine.
pub fn validate_detail(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().chars().count() > MAX_DETAIL_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_DETAIL_LENGTH,
        });
    }

    Ok(())
}

/// Validates the free-text note attached to a sale.
pub fn validate_note(note: &str) -> ValidationResult<()> {
    if note.chars().count() > MAX_NOTE_LENGTH {
        return Err(ValidationError::TooLong {
            field: "additional info".to_string(),
            max: MAX_NOTE_LENGTH,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity requested in a sale.
///
/// ## Rules
/// - Must be non-negative; a ticked line left at 0 is recorded as sold
///   with quantity 0
/// - Must not exceed MAX_LINE_QUANTITY
pub fn validate_sale_quantity(qty: i64) -> ValidationResult<()> {
    if !(0..=MAX_LINE_QUANTITY).contains(&qty) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a stock quantity (initial stock on Add, amount on Restock).
///
/// Zero is allowed: a medicine can be listed before any stock arrives.
pub fn validate_stock_quantity(qty: i64) -> ValidationResult<()> {
    if !(0..=MAX_STOCK_QUANTITY).contains(&qty) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: MAX_STOCK_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Example
/// ```rust
/// use rxdesk_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1099).is_ok());
/// assert!(validate_price_cents(0).is_ok());     // free samples
/// assert!(validate_price_cents(-100).is_err());
/// assert!(validate_price_cents(100_000_000_000_000_000).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_PRICE_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates everything on the Add Medicine form.
pub fn validate_new_medicine(medicine: &NewMedicine) -> ValidationResult<()> {
    validate_medicine_name(&medicine.name)?;
    validate_detail("dosage", &medicine.dosage)?;
    validate_detail("manufacturer", &medicine.manufacturer)?;
    validate_price_cents(medicine.price_cents)?;
    validate_stock_quantity(medicine.quantity)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
