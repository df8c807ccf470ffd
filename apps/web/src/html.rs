//! # HTML Pages
//!
//! Server-rendered pages for the four menu entries plus the sale result and
//! error pages.
//!
//! ## Page Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Medicine Database                                                      │
//! │  [Add Medicine] [View All Medicines] [Delete Medicine] [Buy Medicine]   │
//! │       │                 │                    │                │         │
//! │       ▼                 ▼                    ▼                ▼         │
//! │  new_medicine_page  medicines_page      delete_page       buy_page      │
//! │                     (+ restock form)                          │         │
//! │                                                               ▼         │
//! │                                                   sale_success_page     │
//! │                                                   (CSV + invoice links) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every value that came from a user or the database goes through
//! [`escape`] before it is placed in markup.

use axum::http::StatusCode;
use axum::response::Html;
use std::collections::HashMap;

use crate::routes::medicines::AddMedicineForm;
use rxdesk_core::Medicine;
use rxdesk_sales::SaleReceipt;

const APP_TITLE: &str = "Medicine Database";

const STYLE: &str = "\
body{font-family:sans-serif;margin:2rem;max-width:60rem}\
nav a{margin-right:1rem}\
table{border-collapse:collapse;margin:1rem 0}\
th,td{border:1px solid #999;padding:.3rem .6rem;text-align:left}\
td.num{text-align:right}\
.notice{padding:.5rem 1rem;margin:1rem 0;border-radius:4px}\
.success{background:#e3f6e3}.warning{background:#fff4d6}.error{background:#fde2e2}\
label{display:block;margin:.5rem 0}";

/// Banner shown above a page's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Warning(String),
    Error(String),
}

impl Notice {
    fn render(&self) -> String {
        let (class, text) = match self {
            Notice::Success(t) => ("success", t),
            Notice::Warning(t) => ("warning", t),
            Notice::Error(t) => ("error", t),
        };
        format!(r#"<div class="notice {}">{}</div>"#, class, escape(text))
    }
}

/// Escapes text for use in element content and quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wraps page content in the shared document and navigation.
pub fn layout(heading: &str, notice: Option<&Notice>, body: &str) -> Html<String> {
    let notice = notice.map(Notice::render).unwrap_or_default();
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{heading} - {app}</title>
<style>{style}</style>
</head>
<body>
<h1>{app}</h1>
<nav>
<a href="/medicines/new">Add Medicine</a>
<a href="/medicines">View All Medicines</a>
<a href="/medicines/delete">Delete Medicine</a>
<a href="/sales/new">Buy Medicine</a>
</nav>
<h2>{heading}</h2>
{notice}
{body}
</body>
</html>
"#,
        heading = escape(heading),
        app = APP_TITLE,
        style = STYLE,
        notice = notice,
        body = body,
    ))
}

fn empty_store(heading: &str, notice: Option<&Notice>) -> Html<String> {
    layout(
        heading,
        notice,
        &Notice::Warning("No medicines found.".to_string()).render(),
    )
}

fn medicine_options(medicines: &[Medicine]) -> String {
    medicines
        .iter()
        .map(|m| {
            format!(
                r#"<option value="{}">{} ({}) #{}</option>"#,
                m.id,
                escape(&m.name),
                escape(&m.dosage),
                m.id
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// =============================================================================
// Add Medicine
// =============================================================================

/// The Add Medicine form, refilled with `values` after a rejected submit.
pub fn new_medicine_page(values: &AddMedicineForm, notice: Option<&Notice>) -> Html<String> {
    let body = format!(
        r#"<form method="post" action="/medicines">
<label>Name <input name="name" required value="{name}"></label>
<label>Dosage <input name="dosage" value="{dosage}"></label>
<label>Manufacturer <input name="manufacturer" value="{manufacturer}"></label>
<label>Price <input name="price" inputmode="decimal" value="{price}"></label>
<label>Quantity <input name="quantity" type="number" min="0" step="1" value="{quantity}"></label>
<button type="submit">Add</button>
</form>"#,
        name = escape(&values.name),
        dosage = escape(&values.dosage),
        manufacturer = escape(&values.manufacturer),
        price = escape(&values.price),
        quantity = escape(&values.quantity),
    );
    layout("Add New Medicine", notice, &body)
}

// =============================================================================
// View All Medicines
// =============================================================================

/// Inventory table with a Stock Value column and the restock form.
pub fn medicines_page(medicines: &[Medicine], currency: &str, notice: Option<&Notice>) -> Html<String> {
    const HEADING: &str = "View All Medicines";
    if medicines.is_empty() {
        return empty_store(HEADING, notice);
    }

    let rows: String = medicines
        .iter()
        .map(|m| {
            format!(
                r#"<tr><td class="num">{}</td><td>{}</td><td>{}</td><td>{}</td><td class="num">{}</td><td class="num">{}</td><td class="num">{}</td></tr>"#,
                m.id,
                escape(&m.name),
                escape(&m.dosage),
                escape(&m.manufacturer),
                escape(&m.price().format_with(currency)),
                m.quantity,
                escape(&m.stock_value().format_with(currency)),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let body = format!(
        r#"<table>
<thead><tr><th>ID</th><th>Name</th><th>Dosage</th><th>Manufacturer</th><th>Price</th><th>Quantity</th><th>Stock Value</th></tr></thead>
<tbody>
{rows}
</tbody>
</table>
<h3>Update Stock</h3>
<form method="post" action="/medicines/restock">
<label>Select Medicine <select name="id">
{options}
</select></label>
<label>Quantity to Add <input name="quantity" type="number" min="0" step="1" value="0"></label>
<button type="submit">Update</button>
</form>"#,
        rows = rows,
        options = medicine_options(medicines),
    );
    layout(HEADING, notice, &body)
}

// =============================================================================
// Delete Medicine
// =============================================================================

pub fn delete_page(medicines: &[Medicine], notice: Option<&Notice>) -> Html<String> {
    const HEADING: &str = "Delete Medicine";
    if medicines.is_empty() {
        return empty_store(HEADING, notice);
    }

    let body = format!(
        r#"<form method="post" action="/medicines/delete">
<label>Select Medicine <select name="id">
{options}
</select></label>
<button type="submit">Delete</button>
</form>"#,
        options = medicine_options(medicines),
    );
    layout(HEADING, notice, &body)
}

// =============================================================================
// Buy Medicine
// =============================================================================

/// Selections to keep when the buy form is shown again after an error.
#[derive(Debug, Clone, Default)]
pub struct BuySelection {
    /// Medicine id → quantity text as submitted.
    pub quantities: HashMap<i64, String>,
    pub selected: Vec<i64>,
    pub note: String,
}

/// Multi-select buy form: tick medicines, set quantities, add a note.
pub fn buy_page(
    medicines: &[Medicine],
    currency: &str,
    selection: &BuySelection,
    notice: Option<&Notice>,
) -> Html<String> {
    const HEADING: &str = "Buy Medicine";
    if medicines.is_empty() {
        return empty_store(HEADING, notice);
    }

    let rows: String = medicines
        .iter()
        .map(|m| {
            let checked = if selection.selected.contains(&m.id) { " checked" } else { "" };
            let quantity = selection
                .quantities
                .get(&m.id)
                .map(String::as_str)
                .unwrap_or("1");
            format!(
                r#"<tr><td><input type="checkbox" name="medicine" value="{id}"{checked}></td><td>{name}</td><td>{dosage}</td><td class="num">{price}</td><td class="num">{on_hand}</td><td><input name="qty_{id}" type="number" min="0" step="1" value="{quantity}"></td></tr>"#,
                id = m.id,
                checked = checked,
                name = escape(&m.name),
                dosage = escape(&m.dosage),
                price = escape(&m.price().format_with(currency)),
                on_hand = m.quantity,
                quantity = escape(quantity),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let body = format!(
        r#"<form method="post" action="/sales">
<table>
<thead><tr><th></th><th>Name</th><th>Dosage</th><th>Price</th><th>On Hand</th><th>Quantity</th></tr></thead>
<tbody>
{rows}
</tbody>
</table>
<label>Additional Information <input name="note" value="{note}"></label>
<button type="submit">Buy</button>
</form>"#,
        rows = rows,
        note = escape(&selection.note),
    );
    layout(HEADING, notice, &body)
}

/// Result page after a successful checkout.
pub fn sale_success_page(
    receipt: &SaleReceipt,
    currency: &str,
    ledger_href: Option<&str>,
    invoice_href: Option<&str>,
) -> Html<String> {
    let mut body = format!(
        r#"<p>Total Cost: {total}</p>
<p>Receipt: {receipt} ({items} items)</p>
<ul>"#,
        total = escape(&receipt.total.format_with(currency)),
        receipt = escape(&receipt.receipt_number),
        items = receipt.item_count,
    );

    if let Some(href) = ledger_href {
        body.push_str(&format!(r#"<li><a href="{}">Download CSV</a></li>"#, escape(href)));
    }
    if let Some(href) = invoice_href {
        body.push_str(&format!(r#"<li><a href="{}">Download Invoice</a></li>"#, escape(href)));
    }
    body.push_str("</ul>");

    let notice = Notice::Success("Purchase recorded successfully!".to_string());
    layout("Buy Medicine", Some(&notice), &body)
}

// =============================================================================
// Errors
// =============================================================================

pub fn error_page(status: StatusCode, message: &str) -> Html<String> {
    let heading = status.canonical_reason().unwrap_or("Error");
    let notice = Notice::Error(message.to_string());
    layout(heading, Some(&notice), r#"<p><a href="/medicines">Back to medicines</a></p>"#)
}
