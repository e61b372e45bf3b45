//! Holonet server: reads settings from the environment (and `.env`), ensures
//! the tables exist, then serves the API.
//!
//! Run from repo root: `cargo run -p holonet-server`

use axum::extract::Request;
use axum::ServiceExt;
use holonet::{app, open, AppState, Settings};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("holonet=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    let pool = open(&settings).await?;
    let state = AppState::new(pool);

    let listener = TcpListener::bind(settings.bind_addr()?).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app(state))).await?;
    Ok(())
}
