//! Serve the local character catalogue over HTTP.

use marvel_forwarder::api::{AppState, start_api_server};
use marvel_forwarder::logging::init_tracing;
use marvel_forwarder::{Config, Database, cancel_on_signal};
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::from(1);
        }
    };

    let db = match Database::connect(&config.database_url).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!(error = %e, "Could not open database");
            return ExitCode::from(2);
        }
    };

    let state = AppState::new(Arc::new(db.clone()));
    let result = start_api_server(state, config.server.bind_address, cancel_on_signal()).await;
    db.close().await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "API server failed");
            ExitCode::FAILURE
        }
    }
}
