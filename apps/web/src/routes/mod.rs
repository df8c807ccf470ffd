//! # Routes
//!
//! One module per page group; each exposes `router()` and is merged by
//! [`crate::build_router`].
//!
//! ```text
//! GET  /                          → redirect to /medicines
//! GET  /medicines                 → inventory table + restock form
//! GET  /medicines/new             → Add Medicine form
//! POST /medicines                 → insert, redirect with notice
//! POST /medicines/restock         → increment quantity
//! GET  /medicines/delete          → Delete Medicine form
//! POST /medicines/delete          → delete by id
//! GET  /sales/new                 → Buy Medicine form
//! POST /sales                     → checkout, result page
//! GET  /downloads/ledger/{date}   → sales_<date>.csv
//! GET  /downloads/invoice/{file}  → invoice_*.txt
//! GET  /api/medicines             → inventory as JSON
//! GET  /health                    → store health as JSON
//! ```

pub mod api;
pub mod downloads;
pub mod medicines;
pub mod sales;

use rxdesk_core::ValidationError;

/// Parses a whole number typed into a form field.
pub(crate) fn parse_whole(field: &str, text: &str) -> Result<i64, ValidationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    text.parse().map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: format!("'{}' is not a whole number", text),
    })
}
