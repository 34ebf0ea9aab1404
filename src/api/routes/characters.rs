//! Character handlers: identity listing and detail lookup.

use crate::api::AppState;
use crate::characters::Character;
use crate::error::{Error, Result};
use axum::{
    Json,
    extract::{Path, State},
};

/// GET /characters - List every stored character identity
#[utoipa::path(
    get,
    path = "/characters",
    tag = "characters",
    responses(
        (status = 200, description = "Stored identities, ascending", body = Vec<i64>),
        (status = 500, description = "Internal server error", body = crate::error::ApiError)
    )
)]
pub async fn list_characters(State(state): State<AppState>) -> Result<Json<Vec<i64>>> {
    let ids = state.store.list_character_ids().await?;
    Ok(Json(ids))
}

/// GET /characters/:id - Get one character
#[utoipa::path(
    get,
    path = "/characters/{id}",
    tag = "characters",
    params(
        ("id" = i64, Path, description = "Upstream character ID")
    ),
    responses(
        (status = 200, description = "Character detail", body = Character),
        (status = 400, description = "ID is not an integer", body = crate::error::ApiError),
        (status = 404, description = "No character with this ID", body = crate::error::ApiError),
        (status = 500, description = "Internal server error", body = crate::error::ApiError)
    )
)]
pub async fn get_character(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Character>> {
    let id = parse_id(&raw_id)?;
    let character = state.store.get_character(id).await?;
    Ok(Json(character))
}

fn parse_id(raw: &str) -> Result<i64> {
    raw.parse().map_err(|_| Error::MalformedId(raw.to_string()))
}
