//! # Domain Types
//!
//! Medicine records as stored in the record store, and the stock adjustment
//! direction used by restocking and sales.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Medicine     │   │   NewMedicine   │   │ StockAdjustment │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (rowid)     │   │  (no id yet)    │   │  Increment      │       │
//! │  │  name, dosage   │   │  name, dosage   │   │  Decrement      │       │
//! │  │  manufacturer   │   │  manufacturer   │   └─────────────────┘       │
//! │  │  price_cents    │   │  price_cents    │                              │
//! │  │  quantity       │   │  quantity       │                              │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::Money;
use crate::MAX_STOCK_QUANTITY;

// =============================================================================
// Medicine
// =============================================================================

/// A medicine row in the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Medicine {
    /// Assigned by the store on insert (SQLite AUTOINCREMENT).
    pub id: i64,

    /// Display name shown on the buy form and the invoice.
    pub name: String,

    /// Free-text strength/form, e.g. "500mg tablet".
    pub dosage: String,

    pub manufacturer: String,

    /// Unit price in cents.
    pub price_cents: i64,

    /// Quantity on hand.
    pub quantity: i64,
}

impl Medicine {
    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Value of the stock on hand (price × quantity).
    ///
    /// Shown as the "Stock Value" column on the inventory page.
    #[inline]
    pub fn stock_value(&self) -> Money {
        self.price().multiply_quantity(self.quantity)
    }

    /// Checks whether `quantity` units can be sold.
    ///
    /// With `allow_negative_stock` the answer is yes down to
    /// `-MAX_STOCK_QUANTITY`.
    pub fn can_sell(&self, quantity: i64, allow_negative_stock: bool) -> bool {
        if !allow_negative_stock {
            return self.quantity >= quantity;
        }
        self.quantity
            .checked_sub(quantity)
            .is_some_and(|left| left >= -MAX_STOCK_QUANTITY)
    }
}

// =============================================================================
// New Medicine
// =============================================================================

/// Insert payload for the Add Medicine form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMedicine {
    pub name: String,
    pub dosage: String,
    pub manufacturer: String,
    pub price_cents: i64,
    pub quantity: i64,
}

impl NewMedicine {
    /// Creates an insert payload, trimming the text fields.
    pub fn new(
        name: impl Into<String>,
        dosage: impl Into<String>,
        manufacturer: impl Into<String>,
        price: Money,
        quantity: i64,
    ) -> Self {
        NewMedicine {
            name: name.into().trim().to_string(),
            dosage: dosage.into().trim().to_string(),
            manufacturer: manufacturer.into().trim().to_string(),
            price_cents: price.cents(),
            quantity,
        }
    }

    /// Attaches the id assigned by the store.
    pub fn into_medicine(self, id: i64) -> Medicine {
        Medicine {
            id,
            name: self.name,
            dosage: self.dosage,
            manufacturer: self.manufacturer,
            price_cents: self.price_cents,
            quantity: self.quantity,
        }
    }
}

// =============================================================================
// Stock Adjustment
// =============================================================================

/// Direction of a quantity change on a medicine row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockAdjustment {
    /// Restocking: quantity on hand goes up.
    Increment,
    /// Selling: quantity on hand goes down.
    Decrement,
}

impl StockAdjustment {
    /// Signed delta to add to the current quantity.
    ///
    /// ## Example
    /// ```rust
    /// use rxdesk_core::StockAdjustment;
    ///
    /// assert_eq!(StockAdjustment::Increment.signed(5), 5);
    /// assert_eq!(StockAdjustment::Decrement.signed(5), -5);
    /// ```
    #[inline]
    pub const fn signed(&self, quantity: i64) -> i64 {
        match self {
            StockAdjustment::Increment => quantity,
            StockAdjustment::Decrement => quantity.saturating_neg(),
        }
    }
}

impl fmt::Display for StockAdjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockAdjustment::Increment => write!(f, "increment"),
            StockAdjustment::Decrement => write!(f, "decrement"),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn paracetamol(quantity: i64) -> Medicine {
        Medicine {
            id: 1,
            name: "Paracetamol".to_string(),
            dosage: "500mg".to_string(),
            manufacturer: "Acme Pharma".to_string(),
            price_cents: 250,
            quantity,
        }
    }

    #[test]
    fn test_stock_value() {
        assert_eq!(paracetamol(4).stock_value().cents(), 1000);
        assert_eq!(paracetamol(0).stock_value().cents(), 0);
    }

    #[test]
    fn test_can_sell() {
        let med = paracetamol(3);
        assert!(med.can_sell(3, false));
        assert!(!med.can_sell(4, false));
        assert!(med.can_sell(4, true));

        let deep = paracetamol(-MAX_STOCK_QUANTITY + 2);
        assert!(deep.can_sell(2, true));
        assert!(!deep.can_sell(3, true));
    }

    #[test]
    fn test_new_medicine_trims_text() {
        let new = NewMedicine::new("  Ibuprofen ", "200mg ", " Generic", Money::from_cents(199), 10);
        assert_eq!(new.name, "Ibuprofen");
        assert_eq!(new.dosage, "200mg");
        assert_eq!(new.manufacturer, "Generic");

        let med = new.into_medicine(7);
        assert_eq!(med.id, 7);
        assert_eq!(med.price_cents, 199);
    }

    #[test]
    fn test_adjustment_signs() {
        assert_eq!(StockAdjustment::Increment.signed(5), 5);
        assert_eq!(StockAdjustment::Decrement.signed(5), -5);
        assert_eq!(StockAdjustment::Decrement.signed(i64::MIN), i64::MAX);
        assert_eq!(StockAdjustment::Decrement.to_string(), "decrement");
    }
}
