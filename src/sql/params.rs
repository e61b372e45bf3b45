//! Values that can be bound to an `Any` query.

use sqlx::any::{Any, AnyArguments};
use sqlx::query::Query;

/// A bind parameter. Covers every column type the schema uses.
#[derive(Clone, Debug, PartialEq)]
pub enum BindValue {
    Null,
    Int(i64),
    Text(String),
}

impl From<Option<i64>> for BindValue {
    fn from(v: Option<i64>) -> Self {
        v.map(BindValue::Int).unwrap_or(BindValue::Null)
    }
}

/// Bind `params` in order, matching `$1..$n` in the query text.
pub fn bind_all<'q>(
    mut query: Query<'q, Any, AnyArguments<'q>>,
    params: Vec<BindValue>,
) -> Query<'q, Any, AnyArguments<'q>> {
    for p in params {
        query = match p {
            BindValue::Null => query.bind(None::<i64>),
            BindValue::Int(n) => query.bind(n),
            BindValue::Text(s) => query.bind(s),
        };
    }
    query
}
