//! Per-request repository and request validation.

mod repository;
mod validation;
pub use repository::Repository;
pub use validation::{RequestSchema, RequestValidator, MAX_TEXT_LEN};
