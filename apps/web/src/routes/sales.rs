//! Buy Medicine: the multi-select form and checkout.
//!
//! ## Form Fields
//! ```text
//! medicine=3          one per ticked checkbox
//! qty_3=2             quantity box next to each medicine
//! note=walk-in        Additional Information
//! ```

use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};

use super::parse_whole;
use crate::error::{ApiError, ApiResult};
use crate::html::{self, BuySelection, Notice};
use crate::state::AppState;
use rxdesk_sales::parse_ledger_file_name;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sales/new", get(buy_form))
        .route("/sales", post(checkout))
}

/// Collects the ticked medicines, their quantity boxes and the note.
fn read_selection(fields: &[(String, String)]) -> Result<BuySelection, ApiError> {
    let mut selection = BuySelection::default();

    for (key, value) in fields {
        if key == "medicine" {
            let id = parse_whole("medicine", value)?;
            if !selection.selected.contains(&id) {
                selection.selected.push(id);
            }
        } else if key == "note" {
            selection.note = value.clone();
        } else if let Some(id) = key.strip_prefix("qty_") {
            if let Ok(id) = id.parse::<i64>() {
                selection.quantities.insert(id, value.clone());
            }
        }
    }

    Ok(selection)
}

/// `(medicine id, quantity)` for each ticked medicine, in form order.
fn basket_items(selection: &BuySelection) -> Result<Vec<(i64, i64)>, ApiError> {
    selection
        .selected
        .iter()
        .map(|&id| -> Result<(i64, i64), ApiError> {
            let text = selection.quantities.get(&id).map(String::as_str).unwrap_or("");
            let quantity = parse_whole("quantity", text)?;
            Ok((id, quantity))
        })
        .collect()
}

async fn buy_form(State(state): State<AppState>) -> ApiResult<Html<String>> {
    let medicines = state.db.medicines().list_all().await?;
    Ok(html::buy_page(&medicines, state.currency(), &BuySelection::default(), None))
}

async fn checkout(
    State(state): State<AppState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> ApiResult<Response> {
    let selection = read_selection(&fields)?;

    let outcome = match basket_items(&selection) {
        Ok(items) => state
            .sales
            .checkout_by_ids(&items, &selection.note)
            .await
            .map_err(ApiError::from),
        Err(err) => Err(err),
    };

    let receipt = match outcome {
        Ok(receipt) => receipt,
        Err(err) if err.is_user_error() => {
            let status = err.status();
            let medicines = state.db.medicines().list_all().await?;
            let notice = Notice::Error(err.message);
            let page = html::buy_page(&medicines, state.currency(), &selection, Some(&notice));
            return Ok((status, page).into_response());
        }
        Err(err) => return Err(err),
    };

    let ledger_href = receipt
        .ledger_file_name()
        .and_then(parse_ledger_file_name)
        .map(|date| format!("/downloads/ledger/{}", date.format("%Y-%m-%d")));
    let invoice_href = receipt
        .invoice_file_name()
        .map(|name| format!("/downloads/invoice/{}", name));

    Ok(html::sale_success_page(
        &receipt,
        state.currency(),
        ledger_href.as_deref(),
        invoice_href.as_deref(),
    )
    .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_read_selection() {
        let selection = read_selection(&fields(&[
            ("medicine", "3"),
            ("qty_3", "2"),
            ("qty_5", "1"),
            ("medicine", "5"),
            ("qty_9", "4"),
            ("note", "walk-in"),
        ]))
        .unwrap();

        assert_eq!(selection.selected, vec![3, 5]);
        assert_eq!(selection.note, "walk-in");
        assert_eq!(basket_items(&selection).unwrap(), vec![(3, 2), (5, 1)]);
    }

    #[test]
    fn test_unticked_quantities_ignored() {
        let selection = read_selection(&fields(&[("qty_3", "abc"), ("note", "")])).unwrap();
        assert!(selection.selected.is_empty());
        assert!(basket_items(&selection).unwrap().is_empty());
    }

    #[test]
    fn test_bad_quantity_rejected() {
        let selection = read_selection(&fields(&[("medicine", "3"), ("qty_3", "two")])).unwrap();
        let err = basket_items(&selection).unwrap_err();
        assert!(err.is_user_error());

        assert!(read_selection(&fields(&[("medicine", "x")])).is_err());
    }
}
