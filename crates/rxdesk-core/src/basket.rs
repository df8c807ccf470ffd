//! # Basket
//!
//! The set of (medicine, quantity) pairs a customer buys in one checkout.
//!
//! ## Snapshot Pattern
//! Each line holds a copy of the medicine row as it was when the basket was
//! built. The ledger and invoice are written from these snapshots, so a row
//! deleted or repriced later does not change what was recorded for the sale.
//!
//! ## Parallel Sequences
//! The buy form submits selected medicines and their quantities as two
//! lists. [`Basket::from_parallel`] pairs them by index and refuses to
//! guess when the lengths differ.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Medicine;
use crate::validation::validate_sale_quantity;
use crate::MAX_BASKET_LINES;

// =============================================================================
// Basket Line
// =============================================================================

/// One medicine snapshot and the quantity requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasketLine {
    pub medicine: Medicine,
    pub quantity: i64,
}

impl BasketLine {
    pub fn new(medicine: Medicine, quantity: i64) -> Self {
        BasketLine { medicine, quantity }
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.medicine.price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Basket
// =============================================================================

/// A validated, non-empty purchase basket.
///
/// ## Invariants
/// - At least one line, at most [`MAX_BASKET_LINES`]
/// - Every quantity passes [`validate_sale_quantity`] (zero is allowed)
/// - The total fits in [`Money`] without overflow
/// - Line order is the order the customer selected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Basket {
    lines: Vec<BasketLine>,
}

impl Basket {
    /// Builds a basket from already-paired lines.
    pub fn new(lines: Vec<BasketLine>) -> CoreResult<Self> {
        if lines.is_empty() {
            return Err(CoreError::EmptyBasket);
        }

        if lines.len() > MAX_BASKET_LINES {
            return Err(CoreError::BasketTooLarge {
                max: MAX_BASKET_LINES,
            });
        }

        for line in &lines {
            validate_sale_quantity(line.quantity)?;
        }

        checked_total(&lines).ok_or(CoreError::TotalOverflow)?;

        Ok(Basket { lines })
    }

    /// Pairs medicines with quantities at the same index.
    ///
    /// ## Example
    /// ```rust
    /// use rxdesk_core::{Basket, CoreError, Medicine};
    ///
    /// let med = Medicine {
    ///     id: 1,
    ///     name: "Paracetamol".into(),
    ///     dosage: "500mg".into(),
    ///     manufacturer: "Acme".into(),
    ///     price_cents: 1000,
    ///     quantity: 20,
    /// };
    ///
    /// let basket = Basket::from_parallel(vec![med.clone()], vec![3]).unwrap();
    /// assert_eq!(basket.total().cents(), 3000);
    ///
    /// let err = Basket::from_parallel(vec![med], vec![3, 4]).unwrap_err();
    /// assert!(matches!(err, CoreError::BasketLengthMismatch { .. }));
    /// ```
    pub fn from_parallel(medicines: Vec<Medicine>, quantities: Vec<i64>) -> CoreResult<Self> {
        if medicines.len() != quantities.len() {
            return Err(CoreError::BasketLengthMismatch {
                medicines: medicines.len(),
                quantities: quantities.len(),
            });
        }

        let lines = medicines
            .into_iter()
            .zip(quantities)
            .map(|(medicine, quantity)| BasketLine::new(medicine, quantity))
            .collect();

        Basket::new(lines)
    }

    /// Lines in selection order.
    pub fn lines(&self) -> &[BasketLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Always false for a constructed basket.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Σ(price × quantity) over all lines. Exact, since construction
    /// rejects baskets whose total overflows.
    pub fn total(&self) -> Money {
        self.lines.iter().map(BasketLine::line_total).sum()
    }

    /// Total requested quantity per medicine id.
    ///
    /// A medicine selected twice counts once with the combined quantity,
    /// which is what the stock check has to compare against.
    pub fn requested_by_id(&self) -> BTreeMap<i64, i64> {
        let mut requested = BTreeMap::new();
        for line in &self.lines {
            *requested.entry(line.medicine.id).or_insert(0) += line.quantity;
        }
        requested
    }
}

fn checked_total(lines: &[BasketLine]) -> Option<Money> {
    lines.iter().try_fold(Money::zero(), |total, line| {
        let line_total = line.medicine.price().checked_multiply_quantity(line.quantity)?;
        total.checked_add(line_total)
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
