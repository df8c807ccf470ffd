//! # Medicine Repository
//!
//! Single-statement operations on the `medicines` table.
//!
//! ## Quantity Updates
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Stock Update Strategy                            │
//! │                                                                     │
//! │  ❌ Read, compute, write back                                      │
//! │     SELECT quantity ... ; UPDATE ... SET quantity = 17             │
//! │                                                                     │
//! │  ✅ Delta in one statement                                         │
//! │     UPDATE medicines SET quantity = quantity - 3                   │
//! │     WHERE id = ? RETURNING quantity                                │
//! │                                                                     │
//! │  A restock arriving between the read and the write can't be lost. │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here validates values. The store accepts negative prices and
//! duplicate names; the rules live in `rxdesk_core::validation` and in the
//! sale orchestrator.

use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use rxdesk_core::{Medicine, NewMedicine, StockAdjustment, MAX_STOCK_QUANTITY};

const SELECT_COLUMNS: &str = "SELECT id, name, dosage, manufacturer, price_cents, quantity FROM medicines";

/// Repository for medicine rows.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.medicines();
///
/// let id = repo.insert(&new_medicine).await?;
/// let remaining = repo.adjust_quantity(id, 3, StockAdjustment::Decrement).await?;
/// ```
#[derive(Debug, Clone)]
pub struct MedicineRepository {
    pool: SqlitePool,
}

impl MedicineRepository {
    /// Creates a new MedicineRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MedicineRepository { pool }
    }

    /// Inserts a medicine and returns the id SQLite assigned to it.
    pub async fn insert(&self, medicine: &NewMedicine) -> DbResult<i64> {
        debug!(name = %medicine.name, "Inserting medicine");

        let result = sqlx::query(
            r#"
            INSERT INTO medicines (name, dosage, manufacturer, price_cents, quantity)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&medicine.name)
        .bind(&medicine.dosage)
        .bind(&medicine.manufacturer)
        .bind(medicine.price_cents)
        .bind(medicine.quantity)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(id, "Medicine inserted");
        Ok(id)
    }

    /// Returns every medicine in insertion order.
    pub async fn list_all(&self) -> DbResult<Vec<Medicine>> {
        let medicines = sqlx::query_as::<_, Medicine>(&format!("{SELECT_COLUMNS} ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;

        debug!(count = medicines.len(), "Listed medicines");
        Ok(medicines)
    }

    /// Gets a medicine by id.
    ///
    /// ## Returns
    /// * `Ok(Some(Medicine))` - Medicine found
    /// * `Ok(None)` - No row with that id
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Medicine>> {
        let medicine = sqlx::query_as::<_, Medicine>(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(medicine)
    }

    /// Deletes a medicine.
    ///
    /// Returns `true` when a row was removed. A missing id is not an error;
    /// the table is left unchanged and `false` comes back.
    pub async fn delete(&self, id: i64) -> DbResult<bool> {
        debug!(id, "Deleting medicine");

        let result = sqlx::query("DELETE FROM medicines WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let removed = result.rows_affected() > 0;
        if !removed {
            debug!(id, "Delete matched no rows");
        }
        Ok(removed)
    }

    /// Adds or removes `quantity` units and returns the new quantity on hand.
    ///
    /// A decrement past zero leaves a negative quantity. Callers that must
    /// not oversell check stock first. The new quantity must stay within
    /// `±MAX_STOCK_QUANTITY`; otherwise the row is left untouched.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - no row with that id
    /// * `DbError::QuantityOutOfRange` - the result would leave the bounds
    pub async fn adjust_quantity(
        &self,
        id: i64,
        quantity: i64,
        adjustment: StockAdjustment,
    ) -> DbResult<i64> {
        let delta = adjustment.signed(quantity);
        debug!(id, delta, %adjustment, "Adjusting quantity");

        // An overflowing sum becomes REAL in SQLite and fails the range check.
        let new_quantity: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE medicines
            SET quantity = quantity + ?2
            WHERE id = ?1 AND quantity + ?2 BETWEEN ?3 AND ?4
            RETURNING quantity
            "#,
        )
        .bind(id)
        .bind(delta)
        .bind(-MAX_STOCK_QUANTITY)
        .bind(MAX_STOCK_QUANTITY)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(new_quantity) = new_quantity {
            return Ok(new_quantity);
        }

        let current: Option<i64> = sqlx::query_scalar("SELECT quantity FROM medicines WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match current {
            Some(current) => {
                warn!(id, current, delta, "Quantity adjustment out of range");
                Err(DbError::QuantityOutOfRange { id, current, delta })
            }
            None => Err(DbError::not_found("Medicine", id)),
        }
    }

    /// Counts medicine rows (for diagnostics and the seed binary).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM medicines")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
