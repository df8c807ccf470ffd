//! # rxdesk-sales: Sale Transaction
//!
//! The three side effects of selling medicines, and the service that runs
//! them in order.
//!
//! ## Components
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           SaleService                                   │
//! │                    (service.rs, checkout lock)                          │
//! │          │                    │                      │                  │
//! │          ▼                    ▼                      ▼                  │
//! │  ┌───────────────┐   ┌─────────────────┐   ┌──────────────────┐        │
//! │  │ LedgerWriter  │   │ MedicineRepo    │   │ InvoiceRenderer  │        │
//! │  │ (ledger.rs)   │   │ (rxdesk-db)     │   │ (invoice.rs)     │        │
//! │  │ sales_*.csv   │   │ qty decrement   │   │ invoice_*.txt    │        │
//! │  └───────────────┘   └─────────────────┘   └──────────────────┘        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use rxdesk_sales::{InvoiceLayout, InvoiceRenderer, LedgerWriter, SalePolicy, SaleService};
//!
//! let service = SaleService::new(
//!     db,
//!     LedgerWriter::new("./ledger"),
//!     InvoiceRenderer::new("./invoices", InvoiceLayout::default()),
//!     SalePolicy::default(),
//! );
//! let receipt = service.checkout_by_ids(&[(1, 3)], "walk-in").await?;
//! ```

pub mod error;
pub mod invoice;
pub mod ledger;
pub mod service;

pub use error::{SaleError, SaleResult};
pub use invoice::{invoice_file_name, is_invoice_file_name, InvoiceLayout, InvoiceRenderer};
pub use ledger::{ledger_file_name, parse_ledger_file_name, LedgerWriter, LEDGER_HEADER};
pub use service::{SalePolicy, SaleReceipt, SaleService};
