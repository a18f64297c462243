#![allow(dead_code)]

use autogen_backend::{bootstrap, ColumnConfig, ColumnType, Settings, TableConfig};
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

pub fn memory_settings() -> Settings {
    Settings::from_lookup(|key| match key {
        "DATABASE_URL" => Some("sqlite::memory:".to_string()),
        _ => None,
    })
    .unwrap()
}

pub fn users_and_addresses() -> Vec<TableConfig> {
    vec![
        TableConfig::new(
            "users",
            vec![
                ColumnConfig::new("id", ColumnType::Integer)
                    .primary_key()
                    .autoincrement(),
                ColumnConfig::new("name", ColumnType::String),
                ColumnConfig::new("fullname", ColumnType::String),
            ],
        ),
        TableConfig::new(
            "addresses",
            vec![
                ColumnConfig::new("id", ColumnType::Integer).primary_key(),
                ColumnConfig::references("user_id", "users", "id"),
                ColumnConfig::new("email_address", ColumnType::String).not_null(),
            ],
        ),
    ]
}

pub async fn app(tables: Vec<TableConfig>) -> Router {
    bootstrap(&memory_settings(), tables).await.unwrap()
}

/// Send one request; returns the status and the raw body text.
pub async fn send(app: &Router, method: &str, path: &str, body: Option<&str>) -> (StatusCode, String) {
    let builder = Request::builder().method(method).uri(path);
    let req = match body {
        Some(b) => builder
            .header(header::CONTENT_LENGTH, b.len())
            .body(Body::from(b.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

pub async fn get_json(app: &Router, path: &str) -> (StatusCode, Value) {
    let (status, text) = send(app, "GET", path, None).await;
    (status, serde_json::from_str(&text).unwrap())
}

pub async fn post_json(app: &Router, path: &str, body: &str) -> (StatusCode, Value) {
    let (status, text) = send(app, "POST", path, Some(body)).await;
    (status, serde_json::from_str(&text).unwrap())
}

pub async fn row_count(app: &Router, table: &str) -> usize {
    let (_, rows) = get_json(app, &format!("/{}", table)).await;
    rows.as_array().map(Vec::len).unwrap_or(0)
}
