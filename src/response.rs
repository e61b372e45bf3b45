//! Response envelopes: `{"msg": ...}` for outcomes, `{"data": [...]}` for listings.

use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Message<T> {
    pub msg: T,
}

#[derive(Serialize, Debug)]
pub struct DataList<T> {
    pub data: Vec<T>,
}

pub fn message(status: StatusCode, text: impl Into<String>) -> (StatusCode, Json<Message<String>>) {
    (status, Json(Message { msg: text.into() }))
}

/// `{"msg": <entity>}`; only the planet read endpoint answers this way.
pub fn wrapped<T: Serialize>(data: T) -> (StatusCode, Json<Message<T>>) {
    (StatusCode::OK, Json(Message { msg: data }))
}

pub fn data_list<T: Serialize>(data: Vec<T>) -> (StatusCode, Json<DataList<T>>) {
    (StatusCode::OK, Json(DataList { data }))
}
