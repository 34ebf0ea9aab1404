//! Database layer for marvel-forwarder
//!
//! Handles SQLite persistence for the local character catalogue.
//!
//! ## Submodules
//!
//! Methods on [`Database`] are organized by domain:
//! - [`migrations`] - Database lifecycle, schema migrations
//! - [`characters`] - Batch reconciliation (upsert) and read queries

use sqlx::sqlite::SqlitePool;

mod characters;
mod migrations;

pub use characters::reconcile;

/// Database handle for marvel-forwarder
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
