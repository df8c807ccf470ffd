//! # Invoice Model
//!
//! The document handed to the customer after a sale: ordered lines and a
//! total, keyed by a receipt number.
//!
//! Layout and file output live in `rxdesk-sales`; this module only derives
//! the numbers, so they can be checked without touching the file system.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::basket::Basket;
use crate::money::Money;

/// One row of the invoice table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub line_total: Money,
}

/// An invoice derived from a basket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Identifies the sale; also part of the artifact file name.
    pub receipt_number: String,

    /// Calendar day of the sale.
    pub date: NaiveDate,

    pub lines: Vec<InvoiceLine>,

    /// Σ(unit price × quantity).
    pub total: Money,
}

impl Invoice {
    /// Builds the invoice for a basket, keeping the basket's line order.
    pub fn from_basket(basket: &Basket, receipt_number: impl Into<String>, date: NaiveDate) -> Self {
        let lines: Vec<InvoiceLine> = basket
            .lines()
            .iter()
            .map(|line| InvoiceLine {
                name: line.medicine.name.clone(),
                quantity: line.quantity,
                unit_price: line.medicine.price(),
                line_total: line.line_total(),
            })
            .collect();

        let total = lines.iter().map(|line| line.line_total).sum();

        Invoice {
            receipt_number: receipt_number.into(),
            date,
            lines,
            total,
        }
    }

    /// Number of units across all lines.
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|line| line.quantity).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Medicine;

    fn medicine(id: i64, name: &str, price_cents: i64) -> Medicine {
        Medicine {
            id,
            name: name.to_string(),
            dosage: String::new(),
            manufacturer: String::new(),
            price_cents,
            quantity: 100,
        }
    }

    #[test]
    fn test_invoice_from_basket() {
        let basket = Basket::from_parallel(
            vec![medicine(1, "Medicine A", 1000), medicine(2, "Medicine B", 125)],
            vec![3, 4],
        )
        .unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();

        let invoice = Invoice::from_basket(&basket, "20261016-0001", date);

        assert_eq!(invoice.receipt_number, "20261016-0001");
        assert_eq!(invoice.lines.len(), 2);
        assert_eq!(invoice.lines[0].name, "Medicine A");
        assert_eq!(invoice.lines[0].unit_price.cents(), 1000);
        assert_eq!(invoice.lines[1].line_total.cents(), 500);
        assert_eq!(invoice.total.to_string(), "35.00");
        assert_eq!(invoice.item_count(), 7);
    }

    #[test]
    fn test_invoice_total_matches_basket_total() {
        let basket = Basket::from_parallel(vec![medicine(1, "A", 10)], vec![3]).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();

        let invoice = Invoice::from_basket(&basket, "r", date);
        assert_eq!(invoice.total, basket.total());
        assert_eq!(invoice.total.to_string(), "0.30");
    }

    #[test]
    fn test_invoice_serializes() {
        let basket = Basket::from_parallel(vec![medicine(1, "A", 10)], vec![1]).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let invoice = Invoice::from_basket(&basket, "r", date);

        let json = serde_json::to_string(&invoice).unwrap();
        assert!(json.contains("\"receipt_number\":\"r\""));
        assert!(json.contains("\"date\":\"2026-01-01\""));
    }
}
