//! Shared application state: the pool every request draws its transaction from.

use crate::error::AppError;
use crate::service::Repository;
use sqlx::AnyPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: AnyPool,
}

impl AppState {
    pub fn new(pool: AnyPool) -> Self {
        AppState { pool }
    }

    /// Begin the request's transaction.
    pub async fn repository(&self) -> Result<Repository, AppError> {
        Repository::begin(&self.pool).await
    }
}
