use std::sync::Arc;

use inquiry_desk::{config, Database, SystemClock};
use inquiry_desk_server::{app, logging, AppState, ServerError};
use log::{error, info};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{}", e);
        eprintln!("inquiry-desk-server: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    let config = config::load_from_env()?;
    logging::init_logging(&config.logging)?;

    info!("Starting inquiry desk v{}", env!("CARGO_PKG_VERSION"));

    let db_path = config.database.resolved_path();
    let db = Database::open(&db_path)?;

    let address = config.server.bind_address.clone();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| ServerError::Bind {
            address: address.clone(),
            source,
        })?;

    info!(
        "Listening on {} (api prefix '{}', numbering {:?})",
        address, config.server.api_prefix, config.numbering.strategy
    );

    let state = AppState::new(config, db, Arc::new(SystemClock));
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)?;

    info!("Inquiry desk stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
