//! Shared handler state.

use std::sync::Arc;

use crate::config::RxDeskConfig;
use rxdesk_db::{Database, DbResult};
use rxdesk_sales::SaleService;

/// State cloned into every handler.
///
/// The store handle is opened once at startup and passed down explicitly;
/// the sale service holds its own clone of it.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub sales: Arc<SaleService>,
    pub config: Arc<RxDeskConfig>,
}

impl AppState {
    /// Wires the sale service to an already opened database.
    pub fn new(config: RxDeskConfig, db: Database) -> Self {
        let sales = SaleService::new(
            db.clone(),
            config.ledger_writer(),
            config.invoice_renderer(),
            config.sale_policy(),
        );

        AppState {
            db,
            sales: Arc::new(sales),
            config: Arc::new(config),
        }
    }

    /// Opens the configured database (running migrations) and builds the state.
    pub async fn from_config(config: RxDeskConfig) -> DbResult<Self> {
        let db = Database::new(config.db_config()).await?;
        Ok(AppState::new(config, db))
    }

    /// Currency symbol used on every page.
    pub fn currency(&self) -> &str {
        &self.config.invoice.currency_symbol
    }
}
