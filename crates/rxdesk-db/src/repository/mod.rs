//! # Repository Module
//!
//! Data access for the record store.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Handler / SaleService                                                 │
//! │       │                                                                 │
//! │       │  db.medicines().adjust_quantity(7, 3, Decrement)               │
//! │       ▼                                                                 │
//! │  MedicineRepository                                                    │
//! │  ├── insert(&self, new)                                                │
//! │  ├── list_all(&self)                                                   │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── delete(&self, id)                                                 │
//! │  └── adjust_quantity(&self, id, quantity, direction)                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite (one statement per call)                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod medicine;
