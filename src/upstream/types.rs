//! Wire types for the upstream characters endpoint.

use crate::characters::Character;
use serde::Deserialize;

/// Response envelope: `{code, status, data: {...}}`
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    /// Upstream status code echoed in the body
    #[serde(default)]
    pub code: i64,
    /// Upstream status text
    #[serde(default)]
    pub status: String,
    /// Attribution required by the upstream terms of use
    #[serde(default, rename = "attributionText")]
    pub attribution_text: Option<String>,
    /// The page itself
    pub data: Page,
}

/// One page of the catalogue
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Page {
    /// Offset this page starts at
    pub offset: i64,
    /// Requested page size
    pub limit: i64,
    /// Upstream-reported size of the whole catalogue
    pub total: i64,
    /// Number of results actually returned
    pub count: i64,
    /// Results in upstream order, at most `limit` of them
    #[serde(default)]
    pub results: Vec<CharacterData>,
}

/// A character as the upstream API describes it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CharacterData {
    /// Upstream identity
    pub id: i64,
    /// Display name
    pub name: String,
    /// Description, sometimes null upstream
    #[serde(default)]
    pub description: Option<String>,
}

impl From<CharacterData> for Character {
    fn from(data: CharacterData) -> Self {
        Character {
            id: data.id,
            name: data.name,
            description: data.description.unwrap_or_default(),
        }
    }
}

impl Page {
    /// Convert the page results into characters, preserving order
    pub fn into_characters(self) -> Vec<Character> {
        self.results.into_iter().map(Character::from).collect()
    }
}
