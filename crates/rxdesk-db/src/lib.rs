//! # rxdesk-db: Record Store for RxDesk
//!
//! Persistent medicine inventory on SQLite, accessed through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        RxDesk Data Flow                                 │
//! │                                                                         │
//! │  Web handler / SaleService                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     rxdesk-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌──────────────────┐   ┌─────────────┐  │   │
//! │  │   │   Database    │    │   Repositories   │   │ Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│  (medicine.rs)   │   │ (embedded)  │  │   │
//! │  │   │  SqlitePool   │    │ MedicineRepo     │   │ 001_...sql  │  │   │
//! │  │   └───────────────┘    └──────────────────┘   └─────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite: medicines table                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rxdesk_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("rxdesk.db")).await?;
//! let id = db.medicines().insert(&new_medicine).await?;
//! let all = db.medicines().list_all().await?;
//! ```
//!
//! The `Database` handle is created once and passed explicitly to whoever
//! needs it; there is no process-wide connection.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::medicine::MedicineRepository;
