//! Generic table handlers. One pair serves every table; the route builder hands each
//! call the table it was registered for.

use crate::config::TableDef;
use crate::error::AppError;
use crate::response::{id_response, rows_response};
use crate::service::CrudService;
use crate::state::AppState;
use axum::{body::Bytes, response::Response};
use serde_json::{Map, Value};
use std::sync::Arc;

/// The body is parsed as JSON whatever its content type says.
fn body_to_map(body: &[u8]) -> Result<Map<String, Value>, AppError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| AppError::Insert(format!("invalid JSON body: {}", e)))?;
    match value {
        Value::Object(m) => Ok(m),
        _ => Err(AppError::Insert("body must be a JSON object".into())),
    }
}

pub async fn list(state: AppState, table: Arc<TableDef>) -> Result<Response, AppError> {
    tracing::info!(method = "GET", table = %table.name, "request");
    let rows = CrudService::list(&state.pool, &table).await?;
    Ok(rows_response(rows))
}

pub async fn create(state: AppState, table: Arc<TableDef>, body: Bytes) -> Result<Response, AppError> {
    tracing::info!(method = "POST", table = %table.name, "request");
    let body = body_to_map(&body)?;
    tracing::debug!(body = ?body, "request body");
    let id = CrudService::create(&state.pool, &table, &body).await?;
    Ok(id_response(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_to_map() {
        let m = body_to_map(br#"{"name": "jack"}"#).unwrap();
        assert_eq!(m.get("name").and_then(Value::as_str), Some("jack"));

        let err = body_to_map(b"[1, 2]").err().unwrap();
        assert_eq!(err.to_string(), "body must be a JSON object");

        let err = body_to_map(b"{name").err().unwrap();
        assert!(err.to_string().starts_with("invalid JSON body"));
    }
}
