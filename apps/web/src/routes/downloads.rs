//! File downloads for the sale result page.
//!
//! Only names the sale side produces are served: a ledger is addressed by
//! its date, an invoice by a file name that passes
//! [`is_invoice_file_name`]. Anything else is a 404.

use std::io::ErrorKind;
use std::path::Path as FsPath;

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::NaiveDate;
use tracing::error;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use rxdesk_sales::{is_invoice_file_name, ledger_file_name};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/downloads/ledger/{date}", get(download_ledger))
        .route("/downloads/invoice/{file}", get(download_invoice))
}

async fn download_ledger(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> ApiResult<Response> {
    let day = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|_| ApiError::not_found("Ledger", &date))?;

    let path = state.sales.ledger().ledger_path(day);
    attachment(&path, &ledger_file_name(day), "text/csv; charset=utf-8").await
}

async fn download_invoice(
    State(state): State<AppState>,
    Path(file): Path<String>,
) -> ApiResult<Response> {
    if !is_invoice_file_name(&file) {
        return Err(ApiError::not_found("Invoice", &file));
    }

    let path = state.sales.invoices().dir().join(&file);
    attachment(&path, &file, "text/plain; charset=utf-8").await
}

async fn attachment(path: &FsPath, name: &str, content_type: &str) -> ApiResult<Response> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ApiError::not_found("File", name));
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "Download read failed");
            return Err(ApiError::internal("Could not read the file"));
        }
    };

    let headers = [
        (header::CONTENT_TYPE, content_type.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", name),
        ),
    ];
    Ok((headers, bytes).into_response())
}
