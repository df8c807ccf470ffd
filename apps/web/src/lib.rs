//! # RxDesk Web
//!
//! Form-based pharmacy front desk: add medicines, view and restock the
//! inventory, delete entries, and sell baskets with a CSV ledger and a
//! printable invoice per sale.
//!
//! ## Module Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           rxdesk-web                                    │
//! │                                                                         │
//! │  main.rs ──► config.rs ──► state.rs ──► build_router()                 │
//! │                                              │                          │
//! │                 ┌──────────────┬─────────────┼──────────────┐           │
//! │                 ▼              ▼             ▼              ▼           │
//! │          medicines.rs      sales.rs    downloads.rs      api.rs         │
//! │                 │              │                                        │
//! │                 └──── html.rs ─┘        error.rs (ApiError → page/JSON) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod html;
pub mod routes;
pub mod state;

use axum::{response::Redirect, routing::get, Router};
use tracing_subscriber::EnvFilter;

pub use config::{ConfigError, RxDeskConfig};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use state::AppState;

/// Builds the full router. Used by main.rs and the integration tests.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to("/medicines") }))
        .merge(routes::medicines::router())
        .merge(routes::sales::router())
        .merge(routes::downloads::router())
        .merge(routes::api::router())
        .with_state(state)
}

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,rxdesk=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
