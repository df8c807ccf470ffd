//! # API Error Type
//!
//! Unified error type for request handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in RxDesk Web                             │
//! │                                                                         │
//! │  Handler: Result<Html<String>, ApiError>                               │
//! │         │                                                               │
//! │         ├── ValidationError ──► VALIDATION_ERROR   (400)               │
//! │         ├── CoreError ────────► NOT_FOUND / INSUFFICIENT_STOCK / ...   │
//! │         ├── DbError ──────────► DATABASE_ERROR     (500, detail logged)│
//! │         └── SaleError::Io ────► STORAGE_ERROR      (500, detail logged)│
//! │                                       │                                 │
//! │                                       ▼                                 │
//! │              HTML error page, or JSON under /api (JsonError)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Internal details go to the log; the browser only sees the message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::html;
use rxdesk_core::{CoreError, ValidationError, MAX_STOCK_QUANTITY};
use rxdesk_db::DbError;
use rxdesk_sales::SaleError;

/// Error returned from handlers.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Medicine not found: 12"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Machine-readable error code.
    pub code: ErrorCode,

    /// Human-readable error message for display.
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// More requested than on hand (409)
    InsufficientStock,

    /// Database operation failed (500)
    DatabaseError,

    /// Ledger or invoice file could not be written (500)
    StorageError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::InsufficientStock => StatusCode::CONFLICT,
            ErrorCode::DatabaseError | ErrorCode::StorageError | ErrorCode::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }

    /// True for errors the operator can fix by changing the form input.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::ValidationError | ErrorCode::InsufficientStock | ErrorCode::NotFound
        )
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::QuantityOutOfRange { id, .. } => ApiError::validation(format!(
                "Stock for medicine {} must stay within {} units",
                id, MAX_STOCK_QUANTITY
            )),
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database is busy, try again")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts validation errors to API errors.
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MedicineNotFound(id) => ApiError::not_found("Medicine", &id.to_string()),
            CoreError::InsufficientStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, err.to_string())
            }
            CoreError::EmptyBasket => ApiError::validation("Select at least one medicine to buy"),
            CoreError::BasketTooLarge { .. }
            | CoreError::BasketLengthMismatch { .. }
            | CoreError::TotalOverflow => {
                ApiError::validation(err.to_string())
            }
            CoreError::Validation(e) => e.into(),
        }
    }
}

/// Converts sale errors to API errors.
impl From<SaleError> for ApiError {
    fn from(err: SaleError) -> Self {
        match err {
            SaleError::Core(e) => e.into(),
            SaleError::Db(e) => e.into(),
            SaleError::Io { path, source } => {
                tracing::error!(path = %path.display(), error = %source, "Sale file write failed");
                ApiError::new(ErrorCode::StorageError, "Could not write the sale records")
            }
            SaleError::Csv(e) => {
                tracing::error!(error = %e, "Ledger write failed");
                ApiError::new(ErrorCode::StorageError, "Could not write the sales ledger")
            }
        }
    }
}

/// Renders as an HTML error page.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, html::error_page(status, &self.message)).into_response()
    }
}

/// JSON rendering of [`ApiError`] for the `/api` routes.
#[derive(Debug)]
pub struct JsonError(pub ApiError);

impl From<ApiError> for JsonError {
    fn from(err: ApiError) -> Self {
        JsonError(err)
    }
}

impl From<DbError> for JsonError {
    fn from(err: DbError) -> Self {
        JsonError(err.into())
    }
}

impl From<CoreError> for JsonError {
    fn from(err: CoreError) -> Self {
        JsonError(err.into())
    }
}

impl IntoResponse for JsonError {
    fn into_response(self) -> Response {
        (self.0.status(), Json(self.0)).into_response()
    }
}

/// Result type for HTML handlers.
pub type ApiResult<T> = Result<T, ApiError>;
