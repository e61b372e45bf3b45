//! Route tables and the assembled application service.

mod api;
mod common;
pub use api::api_routes;
pub use common::common_routes_with_ready;

use crate::state::AppState;
use axum::Router;
use tower::Layer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::TraceLayer;

/// Request bodies are small JSON objects.
const BODY_LIMIT: usize = 64 * 1024;

/// Operational and API routes with tracing, CORS and a body limit, wrapped so
/// `/user/` and `/user` route identically.
pub fn app(state: AppState) -> NormalizePath<Router> {
    let router = Router::new()
        .merge(common_routes_with_ready(state.clone()))
        .merge(api_routes(state))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());
    NormalizePathLayer::trim_trailing_slash().layer(router)
}
