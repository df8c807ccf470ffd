//! Add, view, restock and delete medicines.

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use tracing::info;

use super::parse_whole;
use crate::error::{ApiError, ApiResult};
use crate::html::{self, Notice};
use crate::state::AppState;
use rxdesk_core::validation::{validate_new_medicine, validate_stock_quantity};
use rxdesk_core::{Money, NewMedicine, StockAdjustment};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/medicines", get(list_medicines).post(add_medicine))
        .route("/medicines/new", get(new_medicine_form))
        .route("/medicines/restock", post(restock_medicine))
        .route("/medicines/delete", get(delete_form).post(delete_medicine))
}

/// Raw Add Medicine fields, kept as text so a rejected submit can be
/// shown again exactly as typed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddMedicineForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub quantity: String,
}

impl AddMedicineForm {
    fn blank() -> Self {
        AddMedicineForm {
            quantity: "0".to_string(),
            ..Default::default()
        }
    }

    fn parse(&self) -> Result<NewMedicine, ApiError> {
        let price = Money::parse_decimal(&self.price)?;
        let quantity = parse_whole("quantity", &self.quantity)?;
        validate_stock_quantity(quantity)?;

        let medicine = NewMedicine::new(&self.name, &self.dosage, &self.manufacturer, price, quantity);
        validate_new_medicine(&medicine)?;
        Ok(medicine)
    }
}

#[derive(Debug, Deserialize)]
pub struct RestockForm {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub quantity: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    #[serde(default)]
    pub id: String,
}

/// Outcome of the previous POST, carried through the redirect.
#[derive(Debug, Default, Deserialize)]
pub struct FlashQuery {
    pub added: Option<i64>,
    pub restocked: Option<i64>,
    pub deleted: Option<i64>,
    pub missing: Option<i64>,
}

impl FlashQuery {
    fn notice(&self) -> Option<Notice> {
        if self.added.is_some() {
            return Some(Notice::Success("Medicine added successfully!".to_string()));
        }
        if let Some(id) = self.restocked {
            return Some(Notice::Success(format!("Stock updated for medicine with ID {}", id)));
        }
        if let Some(id) = self.deleted {
            return Some(Notice::Success(format!("Deleted medicine with ID {}", id)));
        }
        self.missing
            .map(|id| Notice::Warning(format!("No medicine with ID {}", id)))
    }
}

// =============================================================================
// Handlers
// =============================================================================

async fn list_medicines(
    State(state): State<AppState>,
    Query(flash): Query<FlashQuery>,
) -> ApiResult<Html<String>> {
    let medicines = state.db.medicines().list_all().await?;
    Ok(html::medicines_page(&medicines, state.currency(), flash.notice().as_ref()))
}

async fn new_medicine_form() -> Html<String> {
    html::new_medicine_page(&AddMedicineForm::blank(), None)
}

async fn add_medicine(
    State(state): State<AppState>,
    Form(form): Form<AddMedicineForm>,
) -> ApiResult<Response> {
    let medicine = match form.parse() {
        Ok(medicine) => medicine,
        Err(err) => {
            let status = err.status();
            let page = html::new_medicine_page(&form, Some(&Notice::Error(err.message)));
            return Ok((status, page).into_response());
        }
    };

    let id = state.db.medicines().insert(&medicine).await?;
    info!(id, name = %medicine.name, quantity = medicine.quantity, "Medicine added");

    Ok(Redirect::to(&format!("/medicines?added={}", id)).into_response())
}

async fn restock_medicine(
    State(state): State<AppState>,
    Form(form): Form<RestockForm>,
) -> ApiResult<Redirect> {
    let id = parse_whole("id", &form.id)?;
    let quantity = parse_whole("quantity", &form.quantity)?;
    validate_stock_quantity(quantity)?;

    let on_hand = state
        .db
        .medicines()
        .adjust_quantity(id, quantity, StockAdjustment::Increment)
        .await?;
    info!(id, added = quantity, on_hand, "Medicine restocked");

    Ok(Redirect::to(&format!("/medicines?restocked={}", id)))
}

async fn delete_form(
    State(state): State<AppState>,
    Query(flash): Query<FlashQuery>,
) -> ApiResult<Html<String>> {
    let medicines = state.db.medicines().list_all().await?;
    Ok(html::delete_page(&medicines, flash.notice().as_ref()))
}

/// Deleting an id that is already gone is not an error; the page says so.
async fn delete_medicine(
    State(state): State<AppState>,
    Form(form): Form<DeleteForm>,
) -> ApiResult<Redirect> {
    let id = parse_whole("id", &form.id)?;
    let target = if state.db.medicines().delete(id).await? {
        info!(id, "Medicine deleted");
        format!("/medicines/delete?deleted={}", id)
    } else {
        format!("/medicines/delete?missing={}", id)
    };
    Ok(Redirect::to(&target))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(price: &str, quantity: &str) -> AddMedicineForm {
        AddMedicineForm {
            name: "  Ibuprofen ".to_string(),
            dosage: "200mg".to_string(),
            manufacturer: "Acme Pharma".to_string(),
            price: price.to_string(),
            quantity: quantity.to_string(),
        }
    }

    #[test]
    fn test_parse_form() {
        let medicine = form("4.5", "12").parse().unwrap();
        assert_eq!(medicine.name, "Ibuprofen");
        assert_eq!(medicine.price_cents, 450);
        assert_eq!(medicine.quantity, 12);
    }

    #[test]
    fn test_parse_form_rejects_bad_input() {
        assert!(form("abc", "1").parse().is_err());
        assert!(form("-1", "1").parse().is_err());
        assert!(form("1.00", "-2").parse().is_err());
        assert!(form("1.00", "").parse().is_err());

        let mut nameless = form("1.00", "1");
        nameless.name = "   ".to_string();
        assert!(nameless.parse().is_err());
    }

    #[test]
    fn test_flash_notice() {
        let flash = FlashQuery {
            deleted: Some(4),
            ..Default::default()
        };
        assert_eq!(
            flash.notice(),
            Some(Notice::Success("Deleted medicine with ID 4".to_string()))
        );
        assert_eq!(FlashQuery::default().notice(), None);
    }
}
