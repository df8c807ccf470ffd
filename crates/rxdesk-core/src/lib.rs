//! # rxdesk-core: Pure Business Logic for RxDesk
//!
//! This crate holds the pharmacy domain as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        RxDesk Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Web UI (apps/web, axum)                        │   │
//! │  │   Add ──► View/Restock ──► Delete ──► Buy ──► Downloads         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              rxdesk-sales (ledger, invoice, checkout)           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ rxdesk-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  basket   │  │  invoice  │  │   │
//! │  │   │ Medicine  │  │   Money   │  │  Basket   │  │  Invoice  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO FILES • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  rxdesk-db (Record Store)                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Medicine records and stock adjustments
//! - [`money`] - Money type with integer arithmetic (no floating point)
//! - [`basket`] - Purchase basket built from a checkout form
//! - [`invoice`] - Invoice document model derived from a basket
//! - [`validation`] - Input validation rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use rxdesk_core::money::Money;
//!
//! let price = Money::parse_decimal("10.00").unwrap();
//! let line_total = price.multiply_quantity(3);
//! assert_eq!(line_total.to_string(), "30.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod basket;
pub mod error;
pub mod invoice;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use basket::{Basket, BasketLine};
pub use error::{CoreError, CoreResult, ValidationError};
pub use invoice::{Invoice, InvoiceLine};
pub use money::Money;
pub use types::{Medicine, NewMedicine, StockAdjustment};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed in a single basket.
///
/// ## Business Reason
/// The buy form lists every medicine; a basket larger than this is almost
/// certainly a scripted submission rather than a counter sale.
pub const MAX_BASKET_LINES: usize = 100;

/// Maximum quantity of a single medicine in one sale.
///
/// ## Business Reason
/// Catches typing slips at the counter (10000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 9_999;

/// Maximum unit price in cents (1,000,000.00).
pub const MAX_PRICE_CENTS: i64 = 100_000_000;

/// Bound on quantity on hand, in both directions.
///
/// Initial stock and restock amounts are checked against it, and the store
/// refuses any adjustment that would leave a quantity outside
/// `-MAX_STOCK_QUANTITY..=MAX_STOCK_QUANTITY`. Together with
/// [`MAX_PRICE_CENTS`] this keeps stock values far inside `i64`.
pub const MAX_STOCK_QUANTITY: i64 = 1_000_000;

/// Maximum length of the free-text note attached to a sale.
pub const MAX_NOTE_LENGTH: usize = 500;
