mod common;

use autogen_backend::{build_router, connect, AppState, SchemaRegistry};
use axum::http::StatusCode;
use common::*;
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::collections::HashSet;
use tempfile::TempDir;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_posts_are_independent() {
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite://{}", dir.path().join("concurrent.db").display());
    let pool = connect(&url, 5).await.unwrap();
    let registry = SchemaRegistry::register_tables(users_and_addresses()).unwrap();
    registry.materialize(&pool, false).await.unwrap();
    let app = build_router(AppState::new(pool, registry), 1024);

    let (status, _) = post_json(&app, "/users", r#"{"name":"owner"}"#).await;
    assert_eq!(status, StatusCode::OK);

    let mut handles = Vec::new();
    for i in 0..40 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            let valid = i % 4 != 0;
            let user_id = if valid { 1 } else { 1000 + i };
            let body = format!(r#"{{"user_id":{},"email_address":"u{}@example.com"}}"#, user_id, i);
            let (status, resp) = post_json(&app, "/addresses", &body).await;
            (valid, status, resp)
        }));
    }

    let mut ids = HashSet::new();
    for h in handles {
        let (valid, status, resp) = h.await.unwrap();
        if valid {
            assert_eq!(status, StatusCode::OK, "valid insert failed: {}", resp);
            assert!(ids.insert(resp["id"].as_i64().unwrap()));
        } else {
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(resp["msg"].as_str().unwrap().contains("FOREIGN KEY constraint failed"));
        }
    }
    assert_eq!(ids.len(), 30);

    let (_, rows) = get_json(&app, "/addresses").await;
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 30);
    let stored: HashSet<i64> = rows.iter().filter_map(|r| r["id"].as_i64()).collect();
    assert_eq!(stored, ids);
    assert!(rows.iter().all(|r| r["user_id"] == Value::from(1)));
}
