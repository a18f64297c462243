//! Materialize the registry: CREATE TABLE IF NOT EXISTS for every table, foreign key targets first.

use crate::config::{SchemaRegistry, TableDef};
use crate::error::StorageError;
use crate::sql::{create_table, TABLE_COLUMNS_SQL};
use sqlx::SqlitePool;

/// Create missing tables in dependency order, then check that every table has the declared columns.
/// Existing tables are left untouched; one with a different column list is an error.
pub async fn materialize(
    pool: &SqlitePool,
    registry: &SchemaRegistry,
    strict: bool,
) -> Result<(), StorageError> {
    for table in registry.creation_order() {
        let ddl = create_table(table, strict);
        tracing::debug!(sql = %ddl, "ddl");
        sqlx::query(&ddl).execute(pool).await?;
        verify_columns(pool, table).await?;
        tracing::info!(table = %table.name, "table ready");
    }
    Ok(())
}

async fn verify_columns(pool: &SqlitePool, table: &TableDef) -> Result<(), StorageError> {
    let found: Vec<String> = sqlx::query_scalar(TABLE_COLUMNS_SQL)
        .bind(&table.name)
        .fetch_all(pool)
        .await?;
    let expected: Vec<&str> = table.column_names().collect();
    if found.iter().map(String::as_str).ne(expected.iter().copied()) {
        return Err(StorageError::IncompatibleTable {
            table: table.name.clone(),
            expected: expected.join(", "),
            found: found.join(", "),
        });
    }
    Ok(())
}
