//! RxDesk web server entry point.
//!
//! ```text
//! rxdesk-web                         # config from $RXDESK_CONFIG or the user config dir
//! RXDESK_PORT=9000 rxdesk-web        # environment overrides win over the file
//! ```

use tokio::net::TcpListener;
use tracing::{error, info};

use rxdesk_web::{build_router, init_tracing, AppState, RxDeskConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = RxDeskConfig::load(None)?;
    let address = config.bind_address();

    info!(
        database = %config.database.path.display(),
        ledger_dir = %config.output.ledger_dir.display(),
        invoice_dir = %config.output.invoice_dir.display(),
        allow_negative_stock = config.sales.allow_negative_stock,
        "Starting RxDesk"
    );

    let state = AppState::from_config(config).await?;
    let db = state.db.clone();

    let (applied, total) = db.migration_status().await?;
    info!(applied, total, "Database ready");

    let listener = TcpListener::bind(&address).await?;
    info!("Listening on http://{}", address);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutting down"),
        Err(e) => {
            error!(error = %e, "Could not listen for ctrl-c; running until killed");
            std::future::pending::<()>().await;
        }
    }
}
