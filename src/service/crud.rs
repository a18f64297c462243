//! Generic read-all and insert against SQLite, driven by a resolved table.

use crate::config::{ColumnType, TableDef};
use crate::error::AppError;
use crate::sql::{insert, select_all, SqliteBindValue};
use serde_json::{Map, Value};
use sqlx::sqlite::SqliteRow;
use sqlx::SqlitePool;

pub struct CrudService;

impl CrudService {
    /// Every row of the table, each as an object keyed by column name in declared order.
    pub async fn list(pool: &SqlitePool, table: &TableDef) -> Result<Vec<Value>, AppError> {
        let q = select_all(table);
        tracing::debug!(sql = %q.sql, "query");
        let rows = sqlx::query(&q.sql)
            .fetch_all(pool)
            .await
            .map_err(AppError::Query)?;
        Ok(rows.iter().map(|r| row_to_json(r, table)).collect())
    }

    /// Insert one row in its own transaction. Returns the first primary key value of the new row.
    pub async fn create(
        pool: &SqlitePool,
        table: &TableDef,
        body: &Map<String, Value>,
    ) -> Result<Value, AppError> {
        let q = insert(table, body)?;
        tracing::debug!(sql = %q.sql, params = ?q.params, "query (tx)");
        let mut tx = pool.begin().await.map_err(AppError::insert)?;
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(SqliteBindValue::from_json(p));
        }
        let row = query.fetch_one(&mut *tx).await.map_err(AppError::insert)?;
        let id = cell_to_value(&row, 0, table.id_type());
        tx.commit().await.map_err(AppError::insert)?;
        Ok(id)
    }
}

fn row_to_json(row: &SqliteRow, table: &TableDef) -> Value {
    use sqlx::{Column, Row};
    let mut map = Map::new();
    for (idx, col) in row.columns().iter().enumerate() {
        let ty = table
            .columns
            .get(idx)
            .map(|c| c.column_type)
            .unwrap_or(ColumnType::String);
        map.insert(col.name().to_string(), cell_to_value(row, idx, ty));
    }
    Value::Object(map)
}

/// Decode by declared type first. SQLite keeps whatever type a value was stored with,
/// so fall back through the other storage classes.
fn cell_to_value(row: &SqliteRow, idx: usize, ty: ColumnType) -> Value {
    use sqlx::{Row, ValueRef};
    match row.try_get_raw(idx) {
        Ok(raw) if !raw.is_null() => {}
        _ => return Value::Null,
    }
    match ty {
        ColumnType::Boolean => {
            if let Ok(b) = row.try_get::<bool, _>(idx) {
                return Value::Bool(b);
            }
        }
        ColumnType::DateTime => {
            if let Ok(d) = row.try_get::<chrono::NaiveDateTime, _>(idx) {
                return Value::String(d.format("%Y-%m-%dT%H:%M:%S%.f").to_string());
            }
        }
        ColumnType::Integer | ColumnType::Float | ColumnType::String => {}
    }
    if let Ok(n) = row.try_get::<i64, _>(idx) {
        return Value::Number(n.into());
    }
    if let Ok(f) = row.try_get::<f64, _>(idx) {
        return float_to_value(f);
    }
    if let Ok(s) = row.try_get::<String, _>(idx) {
        return Value::String(s);
    }
    Value::Null
}

/// JSON has no NaN or Infinity; those encode as null instead of failing the response.
fn float_to_value(f: f64) -> Value {
    serde_json::Number::from_f64(f)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
