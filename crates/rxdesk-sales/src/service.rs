//! # Sale Service
//!
//! The checkout workflow: one call turns a basket into a ledger entry, a
//! stock decrement per line and an invoice.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         checkout(basket, note)                          │
//! │                                                                         │
//! │  0. Validate  ── every id exists, quantity > 0, stock covers the        │
//! │       │          combined quantity per id (unless negative stock is     │
//! │       │          allowed). Nothing has been written yet.                │
//! │       ▼                                                                 │
//! │  1. Total     ── Σ(price × quantity), integer cents                     │
//! │       ▼                                                                 │
//! │  2. Ledger    ── sales_<date>.csv, appended exactly once                │
//! │       ▼                                                                 │
//! │  3. Stock     ── adjust_quantity(id, qty, Decrement) per line           │
//! │       ▼                                                                 │
//! │  4. Invoice   ── invoice_<date>_<receipt>.txt                           │
//! │       ▼                                                                 │
//! │  5. SaleReceipt { total, paths, ... }                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Steps 2-4 are not atomic. Validation runs under the same lock as the
//! writes, so the only way to fail after step 2 is an I/O error or a row
//! deleted outside this service.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{SaleError, SaleResult};
use crate::invoice::InvoiceRenderer;
use crate::ledger::LedgerWriter;
use rxdesk_core::validation::validate_note;
use rxdesk_core::{Basket, CoreError, Invoice, Medicine, Money, StockAdjustment};
use rxdesk_db::{Database, DbError};

/// Stock rules applied at checkout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SalePolicy {
    /// Allow selling more than is on hand, leaving a negative quantity.
    /// Default: false
    pub allow_negative_stock: bool,
}

/// What a successful checkout hands back.
#[derive(Debug, Clone, Serialize)]
pub struct SaleReceipt {
    pub sale_id: Uuid,
    pub receipt_number: String,
    pub total: Money,
    /// Number of basket lines.
    pub line_count: usize,
    /// Number of units across all lines.
    pub item_count: i64,
    pub ledger_path: PathBuf,
    pub invoice_path: PathBuf,
}

impl SaleReceipt {
    /// File name of the ledger, for building download links.
    pub fn ledger_file_name(&self) -> Option<&str> {
        file_name(&self.ledger_path)
    }

    /// File name of the invoice, for building download links.
    pub fn invoice_file_name(&self) -> Option<&str> {
        file_name(&self.invoice_path)
    }
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|name| name.to_str())
}

/// Runs checkouts against the record store and the file sinks.
///
/// ## Usage
/// ```rust,ignore
/// let service = SaleService::new(db, ledger, invoices, SalePolicy::default());
/// let receipt = service.checkout_by_ids(&[(1, 3)], "walk-in").await?;
/// println!("Total Cost: {}", receipt.total);
/// ```
#[derive(Debug)]
pub struct SaleService {
    db: Database,
    ledger: LedgerWriter,
    invoices: InvoiceRenderer,
    policy: SalePolicy,
    /// Held from validation to the last write of a checkout.
    checkout_lock: Mutex<()>,
}

impl SaleService {
    pub fn new(
        db: Database,
        ledger: LedgerWriter,
        invoices: InvoiceRenderer,
        policy: SalePolicy,
    ) -> Self {
        SaleService {
            db,
            ledger,
            invoices,
            policy,
            checkout_lock: Mutex::new(()),
        }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn ledger(&self) -> &LedgerWriter {
        &self.ledger
    }

    pub fn invoices(&self) -> &InvoiceRenderer {
        &self.invoices
    }

    pub fn policy(&self) -> SalePolicy {
        self.policy
    }

    /// Resolves `(medicine id, quantity)` pairs to current rows, then checks
    /// out.
    ///
    /// ## Errors
    /// * `CoreError::EmptyBasket` - no pairs
    /// * `CoreError::MedicineNotFound` - an id is not in the store
    pub async fn checkout_by_ids(&self, items: &[(i64, i64)], note: &str) -> SaleResult<SaleReceipt> {
        if items.is_empty() {
            return Err(CoreError::EmptyBasket.into());
        }

        let mut medicines = Vec::with_capacity(items.len());
        let mut quantities = Vec::with_capacity(items.len());
        for &(id, quantity) in items {
            medicines.push(self.find(id).await?);
            quantities.push(quantity);
        }

        let basket = Basket::from_parallel(medicines, quantities)?;
        self.checkout(&basket, note).await
    }

    /// Sells a basket.
    ///
    /// Prices come from the basket snapshot; stock is checked against the
    /// store as it is now.
    ///
    /// ## Errors
    /// * `CoreError::MedicineNotFound` - a line refers to a deleted medicine
    /// * `CoreError::InsufficientStock` - more requested than on hand
    /// * `CoreError::Validation` - note too long
    /// * `SaleError::Io` / `SaleError::Csv` / `SaleError::Db` - a side effect failed
    pub async fn checkout(&self, basket: &Basket, note: &str) -> SaleResult<SaleReceipt> {
        let note = note.trim();
        validate_note(note)?;

        let _guard = self.checkout_lock.lock().await;

        self.validate_stock(basket).await?;

        let total = basket.total();
        let now = Local::now();
        let date = now.date_naive();
        let sale_id = Uuid::new_v4();
        let receipt_number = generate_receipt_number(now, &sale_id);

        debug!(
            sale_id = %sale_id,
            lines = basket.len(),
            total = %total,
            "Checkout validated"
        );

        let ledger_path = self.ledger.append_sale_on(date, basket, note)?;

        for line in basket.lines() {
            let id = line.medicine.id;
            let remaining = self
                .db
                .medicines()
                .adjust_quantity(id, line.quantity, StockAdjustment::Decrement)
                .await
                .map_err(|e| match e {
                    DbError::NotFound { .. } => {
                        warn!(id, "Medicine deleted during checkout");
                        SaleError::from(CoreError::MedicineNotFound(id))
                    }
                    other => SaleError::from(other),
                })?;
            debug!(id, remaining, "Stock decremented");
        }

        let invoice = Invoice::from_basket(basket, receipt_number.clone(), date);
        let invoice_path = self.invoices.write(&invoice, note)?;

        info!(
            sale_id = %sale_id,
            receipt = %receipt_number,
            total = %total,
            lines = basket.len(),
            "Sale completed"
        );

        Ok(SaleReceipt {
            sale_id,
            receipt_number,
            total,
            line_count: basket.len(),
            item_count: invoice.item_count(),
            ledger_path,
            invoice_path,
        })
    }

    /// Checks every id against the store before anything is written.
    async fn validate_stock(&self, basket: &Basket) -> SaleResult<()> {
        for (id, requested) in basket.requested_by_id() {
            let current = self.find(id).await?;

            if !current.can_sell(requested, self.policy.allow_negative_stock) {
                return Err(CoreError::InsufficientStock {
                    name: current.name,
                    available: current.quantity,
                    requested,
                }
                .into());
            }
        }
        Ok(())
    }

    async fn find(&self, id: i64) -> SaleResult<Medicine> {
        self.db
            .medicines()
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::MedicineNotFound(id).into())
    }
}

/// Receipt number: `YYYYMMDD-HHMMSS-<first 8 hex chars of the sale id>`.
///
/// ## Example
/// `20240501-101502-1a2b3c4d`
pub fn generate_receipt_number(now: DateTime<Local>, sale_id: &Uuid) -> String {
    let suffix: String = sale_id.simple().to_string().chars().take(8).collect();
    format!("{}-{}", now.format("%Y%m%d-%H%M%S"), suffix)
}

// =============================================================================
// Unit Tests
// =============================================================================
