//! Shared application state for all routes. The registry is fixed for the process lifetime.

use crate::config::SchemaRegistry;
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub registry: Arc<SchemaRegistry>,
}

impl AppState {
    pub fn new(pool: SqlitePool, registry: SchemaRegistry) -> Self {
        AppState {
            pool,
            registry: Arc::new(registry),
        }
    }
}
