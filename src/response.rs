//! JSON response helpers shared by the generated table handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

/// Body returned after a successful insert.
#[derive(Serialize)]
pub struct InsertedId {
    pub id: Value,
}

/// Body returned for any rejected request.
#[derive(Serialize)]
pub struct ErrorMsg {
    pub msg: String,
}

pub fn json_response<T: Serialize>(status: StatusCode, data: T) -> Response {
    (status, Json(data)).into_response()
}

pub fn rows_response(rows: Vec<Value>) -> Response {
    json_response(StatusCode::OK, rows)
}

pub fn id_response(id: Value) -> Response {
    json_response(StatusCode::OK, InsertedId { id })
}

pub fn msg_response(status: StatusCode, msg: String) -> Response {
    json_response(status, ErrorMsg { msg })
}
