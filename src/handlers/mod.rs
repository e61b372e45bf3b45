//! HTTP handlers: generic entity CRUD plus the user and favorite endpoints.

pub mod entity;
pub mod favorite;
pub mod user;
