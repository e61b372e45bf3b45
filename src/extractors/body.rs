//! Typed, validated JSON bodies.

use crate::error::AppError;
use crate::service::{RequestSchema, RequestValidator};
use async_trait::async_trait;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde_json::Value;

/// JSON body checked against `T::REQUIRED` before it is decoded into `T`.
/// Missing fields answer 400 `{"msg": "Missing field <x>"}`.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: RequestSchema + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(ValidatedJson(RequestValidator::validate(value)?))
    }
}
