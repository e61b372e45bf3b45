//! Typed errors and HTTP mapping.

use crate::response::Message;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unsupported DATABASE_URL '{0}': expected sqlite: or postgres://")]
    UnsupportedDatabaseUrl(String),
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Conflict(String),
    #[error("password hashing: {0}")]
    Password(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

impl AppError {
    /// `"<Entity> with id <id> not found"`.
    pub fn missing(label: &str, id: i64) -> Self {
        AppError::NotFound(format!("{} with id {} not found", label, id))
    }

    /// Replace the text of a `Conflict`, leaving any other error untouched.
    pub fn on_conflict(self, message: impl FnOnce() -> String) -> Self {
        match self {
            AppError::Conflict(_) => AppError::Conflict(message()),
            other => other,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Config(_) | AppError::Password(_) | AppError::Db(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let msg = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(Message { msg })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_keep_their_text() {
        let err = AppError::missing("Planet", 5);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Planet with id 5 not found");
        assert_eq!(
            AppError::Validation("Missing field name".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::Conflict("taken".into()).status(), StatusCode::CONFLICT);
    }

    #[test]
    fn database_errors_are_server_errors() {
        let err = AppError::from(sqlx::Error::PoolTimedOut);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn on_conflict_only_rewrites_conflicts() {
        let err = AppError::Conflict("users violates a uniqueness constraint".into())
            .on_conflict(|| "Username han is already taken".into());
        assert_eq!(err.to_string(), "Username han is already taken");
        let err = AppError::missing("User", 1).on_conflict(|| "unused".into());
        assert_eq!(err.to_string(), "User with id 1 not found");
    }
}
