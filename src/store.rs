//! Pool construction and table DDL for SQLite and PostgreSQL.

use crate::error::AppError;
use crate::settings::{Backend, Settings};
use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;
use std::time::Duration;

/// Open a pool for `settings.database_url`. In-memory SQLite keeps its
/// connection open forever so the database outlives idle periods.
pub async fn connect(settings: &Settings) -> Result<AnyPool, AppError> {
    sqlx::any::install_default_drivers();
    let mut options = AnyPoolOptions::new().max_connections(settings.max_connections);
    if Backend::is_in_memory(&settings.database_url) {
        options = options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>);
    }
    let pool = options.connect(&settings.database_url).await?;
    tracing::info!(backend = ?settings.backend, "database pool ready");
    Ok(pool)
}

/// Connect and create the tables if they do not exist yet.
pub async fn open(settings: &Settings) -> Result<AnyPool, AppError> {
    let pool = connect(settings).await?;
    ensure_tables(&pool, settings.backend).await?;
    Ok(pool)
}

fn id_column(backend: Backend) -> &'static str {
    match backend {
        Backend::Sqlite => "id INTEGER PRIMARY KEY AUTOINCREMENT",
        Backend::Postgres => "id BIGSERIAL PRIMARY KEY",
    }
}

fn reference_type(backend: Backend) -> &'static str {
    match backend {
        Backend::Sqlite => "INTEGER",
        Backend::Postgres => "BIGINT",
    }
}

/// Table DDL in dependency order. Deleting a user, character or planet
/// cascades to the favorites that reference it.
pub fn table_ddl(backend: Backend) -> Vec<String> {
    let id = id_column(backend);
    let fk = reference_type(backend);
    vec![
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                {id},
                name VARCHAR(50) NOT NULL,
                username VARCHAR(50) NOT NULL UNIQUE,
                password VARCHAR(255) NOT NULL
            )
            "#
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS characters (
                {id},
                name VARCHAR(50) NOT NULL
            )
            "#
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS planets (
                {id},
                name VARCHAR(50) NOT NULL
            )
            "#
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS favorites (
                {id},
                user_id {fk} NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                character_id {fk} REFERENCES characters(id) ON DELETE CASCADE,
                planet_id {fk} REFERENCES planets(id) ON DELETE CASCADE,
                CHECK ((character_id IS NULL) <> (planet_id IS NULL))
            )
            "#
        ),
        "CREATE INDEX IF NOT EXISTS favorites_user_id_idx ON favorites (user_id)".to_string(),
    ]
}

pub async fn ensure_tables(pool: &AnyPool, backend: Backend) -> Result<(), AppError> {
    for ddl in table_ddl(backend) {
        sqlx::query(&ddl).execute(pool).await?;
    }
    tracing::debug!(?backend, "tables ensured");
    Ok(())
}
