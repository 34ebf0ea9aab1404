//! Character records and batch deduplication

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// A character as stored locally and served by the read API
///
/// The external `id` is the natural key: two records with the same `id` are
/// the same character whatever their other fields say.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Character {
    /// Upstream identity
    #[serde(rename = "ID")]
    pub id: i64,
    /// Display name
    #[serde(rename = "Name")]
    pub name: String,
    /// Free-text description, may be empty
    #[serde(rename = "Description")]
    pub description: String,
}

impl Character {
    /// Create a new character
    pub fn new(id: i64, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Collapse a batch by identity, last occurrence wins
///
/// The winner replaces earlier records wholesale; fields are never merged.
/// The result is ordered by `id`.
pub fn dedupe(batch: impl IntoIterator<Item = Character>) -> Vec<Character> {
    let mut unique = BTreeMap::new();
    for character in batch {
        unique.insert(character.id, character);
    }
    unique.into_values().collect()
}
