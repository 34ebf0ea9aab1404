//! Read-side storage abstraction used by the HTTP handlers

use crate::characters::Character;
use crate::db::Database;
use crate::error::{Error, Result};
use async_trait::async_trait;

/// Read access to the local character catalogue
///
/// The HTTP layer depends on this trait rather than on [`Database`], so
/// handlers can be exercised against an in-memory store.
#[async_trait]
pub trait CharacterStore: Send + Sync {
    /// Every stored identity, ascending
    async fn list_character_ids(&self) -> Result<Vec<i64>>;

    /// One character by identity
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when no character has this identity.
    async fn get_character(&self, id: i64) -> Result<Character>;
}

#[async_trait]
impl CharacterStore for Database {
    async fn list_character_ids(&self) -> Result<Vec<i64>> {
        Database::list_character_ids(self).await
    }

    async fn get_character(&self, id: i64) -> Result<Character> {
        Database::get_character(self, id)
            .await?
            .ok_or(Error::NotFound { id })
    }
}
