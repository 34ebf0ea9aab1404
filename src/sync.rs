//! Catalogue synchronisation
//!
//! One run fetches the whole upstream catalogue, collapses it by identity and
//! writes it in a single transaction. A run either applies every fetched
//! character or none of them.

use crate::db::Database;
use crate::error::{Error, Result};
use crate::upstream::MarvelClient;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Outcome of a successful run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    /// Characters received from upstream, duplicates included
    pub fetched: usize,
    /// Distinct characters written
    pub unique: usize,
}

/// Drives fetch → dedupe → upsert
#[derive(Clone, Debug)]
pub struct SyncService {
    client: MarvelClient,
    db: Database,
}

impl SyncService {
    /// Create a sync service over an upstream client and a database
    pub fn new(client: MarvelClient, db: Database) -> Self {
        Self { client, db }
    }

    /// Run one synchronisation
    ///
    /// Fetch errors are returned before anything is written. A cancellation
    /// that arrives once the batch is complete does not interrupt the write.
    pub async fn run_once(&self, cancel: &CancellationToken) -> Result<SyncReport> {
        info!(limit = self.client.page_limit(), "Sync run starting");

        let batch = self.client.retrieve_all(cancel).await?;
        let fetched = batch.len();
        let unique = self.db.save_characters(batch).await?;

        info!(fetched, unique, "Sync run complete");
        Ok(SyncReport { fetched, unique })
    }

    /// Run immediately, then every `interval` until `cancel` fires
    ///
    /// A failed run is logged and the schedule continues.
    pub async fn run_periodic(&self, interval: Duration, cancel: CancellationToken) {
        info!(interval_secs = interval.as_secs(), "Periodic sync started");

        loop {
            match self.run_once(&cancel).await {
                Ok(_) => {}
                Err(Error::Cancelled) => break,
                Err(e) => error!(error = %e, "Sync run failed"),
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }
        }

        info!("Periodic sync shutting down");
    }
}
