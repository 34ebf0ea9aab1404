//! Character reconciliation and read queries.

use crate::characters::{Character, dedupe};
use crate::error::DatabaseError;
use crate::{Error, Result};
use sqlx::SqliteConnection;

use super::Database;

// Bundled SQLite (>= 3.32) allows 32766 bind variables per statement.
// Each character uses 3, so max 10922 characters per statement.
const MAX_CHARACTERS_PER_STATEMENT: usize = 10_922;

/// Upsert a deduplicated batch on a connection the caller controls
///
/// Inserts unknown identities and overwrites `name` and `description` of known
/// ones. The caller owns the transaction; nothing is committed or rolled back
/// here and failures are not retried. An empty batch issues no statement.
///
/// The batch must not contain the same `id` twice.
pub async fn reconcile(batch: &[Character], conn: &mut SqliteConnection) -> Result<()> {
    for chunk in batch.chunks(MAX_CHARACTERS_PER_STATEMENT) {
        let mut query_builder =
            sqlx::QueryBuilder::new("INSERT INTO characters (external_id, name, description) ");

        query_builder.push_values(chunk, |mut b, character| {
            b.push_bind(character.id)
                .push_bind(&character.name)
                .push_bind(&character.description);
        });
        query_builder.push(
            " ON CONFLICT (external_id) DO UPDATE SET name = excluded.name, description = excluded.description",
        );

        query_builder
            .build()
            .execute(&mut *conn)
            .await
            .map_err(Error::Write)?;
    }

    Ok(())
}

impl Database {
    /// Deduplicate and persist a fetched batch in one transaction
    ///
    /// Either every row of the batch is applied or none is.
    /// Returns the number of unique characters written.
    pub async fn save_characters(&self, batch: Vec<Character>) -> Result<usize> {
        let unique = dedupe(batch);
        if unique.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await.map_err(Error::Write)?;
        // Dropping `tx` on error rolls the whole batch back
        reconcile(&unique, &mut *tx).await?;
        tx.commit().await.map_err(Error::Write)?;

        tracing::info!(characters = unique.len(), "Saved characters");
        Ok(unique.len())
    }

    /// All stored identities, ascending
    pub async fn list_character_ids(&self) -> Result<Vec<i64>> {
        sqlx::query_scalar("SELECT external_id FROM characters ORDER BY external_id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                Error::Database(DatabaseError::QueryFailed(format!(
                    "Failed to list characters: {}",
                    e
                )))
            })
    }

    /// Look up one character by upstream identity
    pub async fn get_character(&self, id: i64) -> Result<Option<Character>> {
        sqlx::query_as::<_, Character>(
            "SELECT external_id AS id, name, description FROM characters WHERE external_id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to get character: {}",
                e
            )))
        })
    }

    /// Number of stored characters
    pub async fn count_characters(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM characters")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                Error::Database(DatabaseError::QueryFailed(format!(
                    "Failed to count characters: {}",
                    e
                )))
            })
    }
}
