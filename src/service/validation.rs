//! Request body validation: presence of required fields and column width.

use crate::error::AppError;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Width of every text column except the password hash.
pub const MAX_TEXT_LEN: usize = 50;

/// A typed request body and the fields it cannot do without.
pub trait RequestSchema: DeserializeOwned {
    /// Checked in this order; the first absent one is reported.
    const REQUIRED: &'static [&'static str];

    /// Fields stored in width-limited text columns.
    const TEXT_FIELDS: &'static [&'static str] = &[];
}

pub struct RequestValidator;

impl RequestValidator {
    /// Validate a decoded JSON body and convert it into `T`.
    pub fn validate<T: RequestSchema>(body: Value) -> Result<T, AppError> {
        let map = match body {
            Value::Object(m) => m,
            _ => return Err(AppError::BadRequest("Request body must be a JSON object".into())),
        };
        Self::check_required(&map, T::REQUIRED)?;
        Self::check_width(&map, T::TEXT_FIELDS)?;
        serde_json::from_value(Value::Object(map))
            .map_err(|e| AppError::Validation(format!("Invalid request body: {}", e)))
    }

    fn check_required(map: &Map<String, Value>, required: &[&str]) -> Result<(), AppError> {
        for field in required {
            match map.get(*field) {
                None | Some(Value::Null) => {
                    return Err(AppError::Validation(format!("Missing field {}", field)));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    fn check_width(map: &Map<String, Value>, fields: &[&str]) -> Result<(), AppError> {
        for field in fields {
            if let Some(s) = map.get(*field).and_then(Value::as_str) {
                if s.chars().count() > MAX_TEXT_LEN {
                    return Err(AppError::Validation(format!(
                        "Field {} must be at most {} characters",
                        field, MAX_TEXT_LEN
                    )));
                }
            }
        }
        Ok(())
    }
}
