//! User create, read and update. List and delete come from [`super::entity`].

use crate::error::AppError;
use crate::extractors::{EntityId, ValidatedJson};
use crate::models::{NewUser, User, UserChanges};
use crate::password::hash_password;
use crate::response::message;
use crate::service::RequestSchema;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct CreateUser {
    pub name: String,
    pub username: String,
    pub password: String,
}

impl RequestSchema for CreateUser {
    const REQUIRED: &'static [&'static str] = &["name", "username", "password"];
    const TEXT_FIELDS: &'static [&'static str] = &["name", "username"];
}

#[derive(Deserialize, Debug)]
pub struct UpdateUser {
    pub name: String,
    pub username: String,
}

impl RequestSchema for UpdateUser {
    const REQUIRED: &'static [&'static str] = &["name", "username"];
    const TEXT_FIELDS: &'static [&'static str] = &["name", "username"];
}

fn username_taken(username: &str) -> impl FnOnce() -> String + '_ {
    move || format!("Username {} is already taken", username)
}

pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CreateUser>,
) -> Result<impl IntoResponse, AppError> {
    let password_hash = hash_password(&body.password)?;
    let mut repo = state.repository().await?;
    let id = repo
        .insert(NewUser {
            name: body.name,
            username: body.username.clone(),
            password_hash,
        })
        .await
        .map_err(|e| e.on_conflict(username_taken(&body.username)))?;
    repo.commit().await?;
    tracing::info!(id, "user created");
    Ok(message(StatusCode::CREATED, "User created"))
}

/// Bare `{id, name, username}`; no envelope.
pub async fn read(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<impl IntoResponse, AppError> {
    let mut repo = state.repository().await?;
    let user = repo.get::<User>(id).await?;
    repo.commit().await?;
    Ok((StatusCode::OK, Json(user)))
}

pub async fn update(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    ValidatedJson(body): ValidatedJson<UpdateUser>,
) -> Result<impl IntoResponse, AppError> {
    let mut repo = state.repository().await?;
    repo.update(
        id,
        UserChanges {
            name: body.name,
            username: body.username.clone(),
        },
    )
    .await
    .map_err(|e| e.on_conflict(username_taken(&body.username)))?;
    repo.commit().await?;
    Ok(message(StatusCode::OK, "User updated"))
}
