//! Request extractors that fail with [`crate::error::AppError`] bodies.

mod body;
mod id;
pub use body::ValidatedJson;
pub use id::EntityId;
