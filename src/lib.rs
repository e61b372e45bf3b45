//! Holonet: JSON CRUD backend for users, characters, planets and user favorites.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod password;
pub mod response;
pub mod routes;
pub mod service;
pub mod settings;
pub mod sql;
pub mod state;
pub mod store;

pub use error::{AppError, ConfigError};
pub use models::{Character, Favorite, FavoriteTarget, Planet, User};
pub use routes::{api_routes, app, common_routes_with_ready};
pub use service::Repository;
pub use settings::{Backend, Settings};
pub use state::AppState;
pub use store::{connect, ensure_tables, open};
