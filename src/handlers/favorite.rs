//! A user's favorites: listing and adding a character or planet.

use crate::error::AppError;
use crate::extractors::{EntityId, ValidatedJson};
use crate::models::{Character, Entity, FavoriteTarget, NewFavorite, Planet, User};
use crate::response::{data_list, message};
use crate::service::RequestSchema;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct CharacterPick {
    pub character_id: i64,
}

impl RequestSchema for CharacterPick {
    const REQUIRED: &'static [&'static str] = &["character_id"];
}

#[derive(Deserialize, Debug)]
pub struct PlanetPick {
    pub planet_id: i64,
}

impl RequestSchema for PlanetPick {
    const REQUIRED: &'static [&'static str] = &["planet_id"];
}

/// Unknown user and a user without favorites are both 404, with different messages.
pub async fn list(
    State(state): State<AppState>,
    EntityId(user_id): EntityId,
) -> Result<impl IntoResponse, AppError> {
    let mut repo = state.repository().await?;
    repo.require::<User>(user_id).await?;
    let favorites = repo.favorites_of(user_id).await?;
    repo.commit().await?;
    if favorites.is_empty() {
        return Err(AppError::NotFound("No favorites found".into()));
    }
    Ok(data_list(favorites))
}

pub async fn add_character(
    State(state): State<AppState>,
    EntityId(user_id): EntityId,
    ValidatedJson(body): ValidatedJson<CharacterPick>,
) -> Result<impl IntoResponse, AppError> {
    add::<Character>(&state, user_id, FavoriteTarget::Character(body.character_id)).await?;
    Ok(message(StatusCode::CREATED, "Favorite character added"))
}

pub async fn add_planet(
    State(state): State<AppState>,
    EntityId(user_id): EntityId,
    ValidatedJson(body): ValidatedJson<PlanetPick>,
) -> Result<impl IntoResponse, AppError> {
    add::<Planet>(&state, user_id, FavoriteTarget::Planet(body.planet_id)).await?;
    Ok(message(StatusCode::CREATED, "Favorite planet added"))
}

/// `E` is the entity `target` points at; both it and the user must exist.
async fn add<E: Entity>(state: &AppState, user_id: i64, target: FavoriteTarget) -> Result<(), AppError> {
    let target_id = match target {
        FavoriteTarget::Character(id) | FavoriteTarget::Planet(id) => id,
    };
    let mut repo = state.repository().await?;
    repo.require::<User>(user_id).await?;
    repo.require::<E>(target_id).await?;
    let id = repo.insert(NewFavorite { user_id, target }).await?;
    repo.commit().await?;
    tracing::info!(id, user_id, ?target, "favorite added");
    Ok(())
}
