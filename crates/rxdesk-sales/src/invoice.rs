//! # Invoice Renderer
//!
//! Turns an [`Invoice`] into a fixed-width text document and writes one file
//! per sale.
//!
//! ## Layout (paper width 48)
//! ```text
//! ================================================
//!                   Invoice Bill
//!                 RxDesk Pharmacy
//! Receipt: 20240501-101502-1a2b3c4d
//! Date:    2024-05-01
//! ------------------------------------------------
//! Medicine Name               Quantity       Price
//! ------------------------------------------------
//! Amoxicillin                        3       10.00
//! ------------------------------------------------
//! Note: walk-in
//! Total Cost: $30.00
//! ```
//!
//! The price column is the unit price; the total line is Σ(price × qty).
//! Files are named `invoice_<date>_<receipt>.txt` and are never overwritten.

use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{SaleError, SaleResult};
use rxdesk_core::Invoice;

/// Narrowest layout the table header still fits in.
pub const MIN_PAPER_WIDTH: usize = 36;

const QTY_WIDTH: usize = 10;
const PRICE_WIDTH: usize = 12;

/// Static text and sizing for rendered invoices.
///
/// Missing fields deserialize to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceLayout {
    /// Centred first line.
    pub title: String,

    /// Centred under the title. Omitted when empty.
    pub store_name: String,

    /// Prefix on the total line.
    pub currency_symbol: String,

    /// Characters per line (typically 42 or 48). Values below
    /// [`MIN_PAPER_WIDTH`] render at the minimum.
    pub paper_width: usize,
}

impl Default for InvoiceLayout {
    fn default() -> Self {
        InvoiceLayout {
            title: "Invoice Bill".to_string(),
            store_name: "RxDesk Pharmacy".to_string(),
            currency_symbol: "$".to_string(),
            paper_width: 48,
        }
    }
}

/// File name for an invoice artifact.
pub fn invoice_file_name(invoice: &Invoice) -> String {
    format!(
        "invoice_{}_{}.txt",
        invoice.date.format("%Y-%m-%d"),
        invoice.receipt_number
    )
}

/// True when `name` could have come from [`invoice_file_name`].
///
/// Used by the download route, so it only admits a plain file name.
pub fn is_invoice_file_name(name: &str) -> bool {
    let Some(stem) = name
        .strip_prefix("invoice_")
        .and_then(|rest| rest.strip_suffix(".txt"))
    else {
        return false;
    };

    !stem.is_empty()
        && stem
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Renders and stores invoices.
#[derive(Debug, Clone)]
pub struct InvoiceRenderer {
    dir: PathBuf,
    layout: InvoiceLayout,
}

impl InvoiceRenderer {
    /// Creates a renderer writing into `dir` (created on first write).
    pub fn new(dir: impl Into<PathBuf>, layout: InvoiceLayout) -> Self {
        InvoiceRenderer {
            dir: dir.into(),
            layout,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn layout(&self) -> &InvoiceLayout {
        &self.layout
    }

    /// Renders the invoice as text. The last line is always the total.
    pub fn render(&self, invoice: &Invoice, note: &str) -> String {
        let width = self.layout.paper_width.max(MIN_PAPER_WIDTH);
        let (qty_width, price_width) = (QTY_WIDTH, PRICE_WIDTH);
        let name_width = width - qty_width - price_width;
        let rule = "-".repeat(width);

        let mut lines = Vec::with_capacity(invoice.lines.len() + 12);
        lines.push("=".repeat(width));
        lines.push(center(&self.layout.title, width));
        if !self.layout.store_name.trim().is_empty() {
            lines.push(center(&self.layout.store_name, width));
        }
        lines.push(format!("Receipt: {}", invoice.receipt_number));
        lines.push(format!("Date:    {}", invoice.date.format("%Y-%m-%d")));

        lines.push(rule.clone());
        lines.push(format!(
            "{:<name_width$}{:>qty_width$}{:>price_width$}",
            "Medicine Name", "Quantity", "Price"
        ));
        lines.push(rule.clone());

        for line in &invoice.lines {
            lines.push(format!(
                "{:<name_width$}{:>qty_width$}{:>price_width$}",
                truncate(&line.name, name_width - 1),
                line.quantity,
                line.unit_price.to_string(),
            ));
        }
        lines.push(rule);

        let note = note.trim();
        if !note.is_empty() {
            lines.extend(wrap(&format!("Note: {}", note), width));
        }

        lines.push(format!(
            "Total Cost: {}",
            invoice.total.format_with(&self.layout.currency_symbol)
        ));

        let mut text = lines.join("\n");
        text.push('\n');
        text
    }

    /// Renders the invoice and writes it to its own file.
    ///
    /// ## Errors
    /// * `SaleError::Io` - directory not writable, or a file for this
    ///   receipt number already exists
    pub fn write(&self, invoice: &Invoice, note: &str) -> SaleResult<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|e| SaleError::io(&self.dir, e))?;

        let path = self.dir.join(invoice_file_name(invoice));
        let text = self.render(invoice, note);

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| SaleError::io(&path, e))?;

        file.write_all(text.as_bytes())
            .map_err(|e| SaleError::io(&path, e))?;

        info!(
            path = %path.display(),
            receipt = %invoice.receipt_number,
            total = %invoice.total,
            "Invoice written"
        );
        Ok(path)
    }
}

fn center(text: &str, width: usize) -> String {
    let text = truncate(text.trim(), width);
    let pad = (width - text.chars().count()) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Greedy word wrap. Words longer than a line are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(width);
            out.push(word.into_iter().collect());
            word = rest;
        }

        let word: String = word.into_iter().collect();
        let needed = usize::from(!current.is_empty()) + word.chars().count();
        if current.chars().count() + needed > width {
            out.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }

    if !current.is_empty() {
        out.push(current);
    }
    out
}

// =============================================================================
// Unit Tests
// =============================================================================
