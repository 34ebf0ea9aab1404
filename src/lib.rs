//! # marvel-forwarder
//!
//! Keeps a local copy of the Marvel characters catalogue and serves it over a
//! small read-only HTTP API.
//!
//! ## Architecture
//!
//! - **Sync** (`bifrost`) - signs requests, reads page 0 to learn the catalogue
//!   size, fetches every other page concurrently with bounded retries, collapses
//!   duplicates and upserts the whole batch in one transaction.
//! - **Read API** (`serverd`) - lists stored IDs and returns single characters
//!   from the local database.
//!
//! ## Quick Start
//!
//! ```no_run
//! use marvel_forwarder::{Config, Database, MarvelClient, SyncService};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let db = Database::connect(&config.database_url).await?;
//!     let client = MarvelClient::new(config.upstream, config.retry)?;
//!
//!     let report = SyncService::new(client, db)
//!         .run_once(&CancellationToken::new())
//!         .await?;
//!     println!("{} characters written", report.unique);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Read API module
pub mod api;
/// Character records and deduplication
pub mod characters;
/// Configuration types
pub mod config;
/// Database persistence layer
pub mod db;
/// Error types
pub mod error;
/// Tracing subscriber setup
pub mod logging;
/// Retry logic with exponential backoff
pub mod retry;
/// Request signing
pub mod signer;
/// Read-side storage abstraction
pub mod store;
/// Catalogue synchronisation
pub mod sync;
/// Upstream catalogue client
pub mod upstream;

// Re-export commonly used types
pub use characters::Character;
pub use config::Config;
pub use db::Database;
pub use error::{ApiError, DatabaseError, Error, Result, ToHttpStatus};
pub use store::CharacterStore;
pub use sync::{SyncReport, SyncService};
pub use upstream::MarvelClient;

use tokio_util::sync::CancellationToken;

/// Create a token that is cancelled when the process receives a termination signal.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// Must be called from within a Tokio runtime.
pub fn cancel_on_signal() -> CancellationToken {
    let token = CancellationToken::new();
    tokio::spawn({
        let token = token.clone();
        async move {
            wait_for_signal().await;
            token.cancel();
        }
    });
    token
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Registration may fail in restricted environments (containers, tests)
    match (
        signal(SignalKind::terminate()),
        signal(SignalKind::interrupt()),
    ) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => tracing::info!("Received SIGTERM signal"),
                _ = sigint.recv() => tracing::info!("Received SIGINT signal (Ctrl+C)"),
            }
        }
        (Err(e), Ok(mut sigint)) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            sigint.recv().await;
            tracing::info!("Received SIGINT signal (Ctrl+C)");
        }
        (Ok(mut sigterm), Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            sigterm.recv().await;
            tracing::info!("Received SIGTERM signal");
        }
        (Err(_), Err(e)) => {
            tracing::error!(error = %e, "Could not register any signal handlers, using ctrl_c fallback");
            tokio::signal::ctrl_c().await.ok();
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
