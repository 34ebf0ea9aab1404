//! Synchronise the local catalogue with the upstream characters API.
//!
//! Runs once and exits, or keeps syncing on a schedule when
//! `SYNC_INTERVAL_SECS` is set. Exit status: 1 configuration, 2 database
//! connection, 3 fetch failure, 4 write failure.

use marvel_forwarder::logging::init_tracing;
use marvel_forwarder::{Config, Database, Error, MarvelClient, SyncService, cancel_on_signal};
use std::process::ExitCode;

const EXIT_CONFIG: u8 = 1;
const EXIT_DATABASE: u8 = 2;
const EXIT_FETCH: u8 = 3;
const EXIT_WRITE: u8 = 4;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    tracing::info!("Starting sync with the upstream characters API");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    let client = match MarvelClient::new(config.upstream, config.retry) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "Could not create upstream client");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    let db = match Database::connect(&config.database_url).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!(error = %e, "Could not open database");
            return ExitCode::from(EXIT_DATABASE);
        }
    };

    let cancel = cancel_on_signal();
    let service = SyncService::new(client, db.clone());

    let code = match config.sync.interval {
        Some(interval) => {
            service.run_periodic(interval, cancel).await;
            ExitCode::SUCCESS
        }
        None => match service.run_once(&cancel).await {
            Ok(report) => {
                tracing::info!(fetched = report.fetched, unique = report.unique, "Sync finished");
                ExitCode::SUCCESS
            }
            Err(e @ Error::Write(_)) => {
                tracing::error!(error = %e, "Could not save characters");
                ExitCode::from(EXIT_WRITE)
            }
            Err(e) => {
                tracing::error!(error = %e, "Could not retrieve characters");
                ExitCode::from(EXIT_FETCH)
            }
        },
    };

    db.close().await;
    code
}
