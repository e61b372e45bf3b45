//! Resource routes. Path ids are integers; see [`crate::extractors::EntityId`].
//! `/character/:id` has no GET route; a GET there answers 405.

use crate::handlers::{entity, favorite, user};
use crate::models::{Character, Planet, User};
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/user", get(entity::list::<User>).post(user::create))
        .route(
            "/user/:id",
            get(user::read).put(user::update).delete(entity::delete::<User>),
        )
        .route("/user/:id/favorite", get(favorite::list))
        .route("/user/:id/favorite/character", post(favorite::add_character))
        .route("/user/:id/favorite/planet", post(favorite::add_planet))
        .route(
            "/character",
            get(entity::list::<Character>).post(entity::create::<Character>),
        )
        .route(
            "/character/:id",
            put(entity::update::<Character>).delete(entity::delete::<Character>),
        )
        .route(
            "/planet",
            get(entity::list::<Planet>).post(entity::create::<Planet>),
        )
        .route(
            "/planet/:id",
            get(entity::read_wrapped::<Planet>)
                .put(entity::update::<Planet>)
                .delete(entity::delete::<Planet>),
        )
        .with_state(state)
}
