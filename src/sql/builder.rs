//! Builds DDL and parameterized SELECT/INSERT from a resolved table.

use crate::config::{ColumnDef, ColumnType, TableDef};
use crate::error::AppError;
use serde_json::{Map, Value};

/// Quote identifier for SQLite (safe: only from validated config).
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: Value) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

/// Declared column type. STRICT tables only accept INTEGER, REAL, TEXT, BLOB and ANY.
fn type_name(ty: ColumnType, strict: bool) -> &'static str {
    match (ty, strict) {
        (ColumnType::Integer, _) => "INTEGER",
        (ColumnType::Float, _) => "REAL",
        (ColumnType::String, true) => "TEXT",
        (ColumnType::String, false) => "VARCHAR",
        (ColumnType::Boolean, true) => "INTEGER",
        (ColumnType::Boolean, false) => "BOOLEAN",
        (ColumnType::DateTime, true) => "TEXT",
        (ColumnType::DateTime, false) => "DATETIME",
    }
}

fn column_def(table: &TableDef, c: &ColumnDef, strict: bool) -> String {
    let mut def = format!("{} {}", quoted(&c.name), type_name(c.column_type, strict));
    if !c.nullable && !table.is_rowid_alias(c) {
        def.push_str(" NOT NULL");
    }
    if c.autoincrement {
        def.push_str(" PRIMARY KEY AUTOINCREMENT");
    }
    if c.unique {
        def.push_str(" UNIQUE");
    }
    if let Some(ref d) = c.default {
        def.push_str(" DEFAULT ");
        def.push_str(d);
    }
    def
}

/// CREATE TABLE IF NOT EXISTS with columns in declared order, then key constraints.
pub fn create_table(table: &TableDef, strict: bool) -> String {
    let mut defs: Vec<String> = table
        .columns
        .iter()
        .map(|c| column_def(table, c, strict))
        .collect();

    if !table.columns.iter().any(|c| c.autoincrement) {
        let pk: Vec<String> = table.primary_key.iter().map(|s| quoted(s)).collect();
        defs.push(format!("PRIMARY KEY ({})", pk.join(", ")));
    }
    for c in &table.columns {
        if let Some(ref fk) = c.foreign_key {
            defs.push(format!(
                "FOREIGN KEY ({}) REFERENCES {} ({})",
                quoted(&c.name),
                quoted(&fk.table),
                quoted(&fk.column)
            ));
        }
    }

    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n  {}\n){}",
        quoted(&table.name),
        defs.join(",\n  "),
        if strict { " STRICT" } else { "" }
    )
}

/// SELECT every declared column, in declared order. No filter, no limit.
pub fn select_all(table: &TableDef) -> QueryBuf {
    let mut q = QueryBuf::new();
    let cols: Vec<String> = table.column_names().map(quoted).collect();
    q.sql = format!("SELECT {} FROM {}", cols.join(", "), quoted(&table.name));
    q
}

/// INSERT one row from body; columns absent from body are left to the engine's defaults.
/// Returns the primary key columns. Fails on keys that are not columns of the table.
pub fn insert(table: &TableDef, body: &Map<String, Value>) -> Result<QueryBuf, AppError> {
    let mut unknown: Vec<&str> = body
        .keys()
        .map(String::as_str)
        .filter(|k| table.column(k).is_none())
        .collect();
    if !unknown.is_empty() {
        unknown.sort_unstable();
        return Err(AppError::Insert(format!(
            "unknown column(s) for table {}: {}",
            table.name,
            unknown.join(", ")
        )));
    }

    let mut q = QueryBuf::new();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for c in &table.columns {
        let Some(val) = body.get(&c.name) else { continue };
        let param_num = q.push_param(val.clone());
        cols.push(quoted(&c.name));
        placeholders.push(format!("?{}", param_num));
    }
    let returning: Vec<String> = table.primary_key.iter().map(|s| quoted(s)).collect();
    let values = if cols.is_empty() {
        "DEFAULT VALUES".to_string()
    } else {
        format!("({}) VALUES ({})", cols.join(", "), placeholders.join(", "))
    };
    q.sql = format!(
        "INSERT INTO {} {} RETURNING {}",
        quoted(&table.name),
        values,
        returning.join(", ")
    );
    Ok(q)
}

/// Physical column names of an existing table, in storage order. Binds the table name.
pub const TABLE_COLUMNS_SQL: &str = "SELECT name FROM pragma_table_info(?1) ORDER BY cid";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{resolve, ColumnConfig, TableConfig};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    fn tables() -> Vec<Arc<TableDef>> {
        let registry = resolve(&[
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
        ])
        .unwrap();
        registry.tables().to_vec()
    }

    #[test]
    fn test_create_table_autoincrement() {
        let t = tables();
        assert_eq!(
            create_table(&t[0], false),
            "CREATE TABLE IF NOT EXISTS \"users\" (\n  \
             \"id\" INTEGER PRIMARY KEY AUTOINCREMENT,\n  \
             \"name\" VARCHAR,\n  \
             \"fullname\" VARCHAR\n)"
        );
    }

    #[test]
    fn test_create_table_foreign_key_strict() {
        let t = tables();
        assert_eq!(
            create_table(&t[1], true),
            "CREATE TABLE IF NOT EXISTS \"addresses\" (\n  \
             \"id\" INTEGER,\n  \
             \"user_id\" INTEGER,\n  \
             \"email_address\" TEXT NOT NULL,\n  \
             PRIMARY KEY (\"id\"),\n  \
             FOREIGN KEY (\"user_id\") REFERENCES \"users\" (\"id\")\n) STRICT"
        );
    }

    #[test]
    fn test_select_all_keeps_declared_order() {
        let t = tables();
        assert_eq!(
            select_all(&t[0]).sql,
            "SELECT \"id\", \"name\", \"fullname\" FROM \"users\""
        );
    }

    #[test]
    fn test_insert_uses_declared_order() {
        let t = tables();
        let body = json!({"email_address": "jack@example.com", "user_id": 1});
        let q = insert(&t[1], body.as_object().unwrap()).unwrap();
        assert_eq!(
            q.sql,
            "INSERT INTO \"addresses\" (\"user_id\", \"email_address\") VALUES (?1, ?2) RETURNING \"id\""
        );
        assert_eq!(q.params, vec![json!(1), json!("jack@example.com")]);
    }

    #[test]
    fn test_insert_empty_body() {
        let t = tables();
        let q = insert(&t[0], &Map::new()).unwrap();
        assert_eq!(q.sql, "INSERT INTO \"users\" DEFAULT VALUES RETURNING \"id\"");
        assert!(q.params.is_empty());
    }

    #[test]
    fn test_insert_unknown_column() {
        let t = tables();
        let body = json!({"name": "jack", "nickname": "j", "age": 3});
        let err = insert(&t[0], body.as_object().unwrap()).err().unwrap();
        assert_eq!(
            err.to_string(),
            "unknown column(s) for table users: age, nickname"
        );
    }

    #[test]
    fn test_quoted_escapes() {
        assert_eq!(quoted("a\"b"), "\"a\"\"b\"");
    }
}
