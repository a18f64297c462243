//! Startup: registry → storage → schema → routes. Any failure aborts before a route exists.

use crate::config::{SchemaRegistry, TableConfig};
use crate::error::AppError;
use crate::routes::{common_routes, table_routes};
use crate::settings::Settings;
use crate::state::AppState;
use crate::store::connect;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

/// Fixed routes plus one route per registered table.
pub fn build_router(state: AppState, body_limit_bytes: usize) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(table_routes(state))
        .layer(RequestBodyLimitLayer::new(body_limit_bytes))
}

/// Register the tables, open storage, materialize the schema and build the router.
pub async fn bootstrap(settings: &Settings, tables: Vec<TableConfig>) -> Result<Router, AppError> {
    let registry = SchemaRegistry::register_tables(tables)?;
    let pool = connect(&settings.database_url, settings.max_connections).await?;
    registry.materialize(&pool, settings.strict_tables).await?;
    tracing::info!(tables = registry.tables().len(), "schema materialized");
    Ok(build_router(
        AppState::new(pool, registry),
        settings.body_limit_bytes,
    ))
}
