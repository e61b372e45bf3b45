//! Entity CRUD handlers shared by every resource: list, create, read, update, delete.
//! Character and planet are served entirely from here; user reuses list and delete.

use crate::error::AppError;
use crate::extractors::{EntityId, ValidatedJson};
use crate::models::{Entity, NameChange, NamedEntity};
use crate::response::{data_list, message, wrapped};
use crate::service::RequestSchema;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;

/// Body of POST and PUT for named entities.
#[derive(Deserialize, Debug)]
pub struct NameBody {
    pub name: String,
}

impl RequestSchema for NameBody {
    const REQUIRED: &'static [&'static str] = &["name"];
    const TEXT_FIELDS: &'static [&'static str] = &["name"];
}

/// `{"data": [...]}` with every row.
pub async fn list<E: Entity>(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let mut repo = state.repository().await?;
    let rows = repo.list::<E>().await?;
    repo.commit().await?;
    Ok(data_list(rows))
}

pub async fn create<E: NamedEntity>(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<NameBody>,
) -> Result<impl IntoResponse, AppError> {
    let mut repo = state.repository().await?;
    let id = repo.insert(NameChange::<E>::new(body.name)).await?;
    repo.commit().await?;
    tracing::info!(entity = E::LABEL, id, "created");
    Ok(message(StatusCode::CREATED, format!("{} created", E::LABEL)))
}

/// Single row inside the `msg` envelope.
pub async fn read_wrapped<E: Entity>(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<impl IntoResponse, AppError> {
    let mut repo = state.repository().await?;
    let row = repo.get::<E>(id).await?;
    repo.commit().await?;
    Ok(wrapped(row))
}

pub async fn update<E: NamedEntity>(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    ValidatedJson(body): ValidatedJson<NameBody>,
) -> Result<impl IntoResponse, AppError> {
    let mut repo = state.repository().await?;
    repo.update(id, NameChange::<E>::new(body.name)).await?;
    repo.commit().await?;
    Ok(message(StatusCode::OK, format!("{} updated", E::LABEL)))
}

/// Answers 202; favorites pointing at the row go with it.
pub async fn delete<E: Entity>(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<impl IntoResponse, AppError> {
    let mut repo = state.repository().await?;
    repo.delete::<E>(id).await?;
    repo.commit().await?;
    tracing::info!(entity = E::LABEL, id, "deleted");
    Ok(message(StatusCode::ACCEPTED, format!("{} deleted", E::LABEL)))
}
