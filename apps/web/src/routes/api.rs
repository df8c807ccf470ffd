//! JSON endpoints: inventory listing and health.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use crate::error::JsonError;
use crate::state::AppState;
use rxdesk_core::Medicine;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/medicines", get(list_medicines))
        .route("/health", get(health))
}

/// Inventory row as served to scripts.
///
/// `price` and `stock_value` are two-decimal strings; `price_cents` is the
/// stored integer.
#[derive(Debug, Serialize)]
pub struct MedicineDto {
    pub id: i64,
    pub name: String,
    pub dosage: String,
    pub manufacturer: String,
    pub price: String,
    pub price_cents: i64,
    pub quantity: i64,
    pub stock_value: String,
}

impl From<Medicine> for MedicineDto {
    fn from(m: Medicine) -> Self {
        MedicineDto {
            price: m.price().to_string(),
            stock_value: m.stock_value().to_string(),
            id: m.id,
            name: m.name,
            dosage: m.dosage,
            manufacturer: m.manufacturer,
            price_cents: m.price_cents,
            quantity: m.quantity,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub database: &'static str,
}

async fn list_medicines(State(state): State<AppState>) -> Result<Json<Vec<MedicineDto>>, JsonError> {
    let medicines = state.db.medicines().list_all().await?;
    Ok(Json(medicines.into_iter().map(MedicineDto::from).collect()))
}

async fn health(State(state): State<AppState>) -> (StatusCode, Json<Health>) {
    if state.db.health_check().await {
        (
            StatusCode::OK,
            Json(Health {
                status: "ok",
                database: "ok",
            }),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(Health {
                status: "degraded",
                database: "unavailable",
            }),
        )
    }
}
