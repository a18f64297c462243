//! Resolved schema: config validated and flattened for runtime use.

use crate::config::{resolve, ColumnType, TableConfig};
use crate::error::{ConfigError, StorageError};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForeignKey {
    pub table: String,
    pub column: String,
}

#[derive(Clone, Debug)]
pub struct ColumnDef {
    pub name: String,
    pub column_type: ColumnType,
    pub nullable: bool,
    pub primary_key: bool,
    pub autoincrement: bool,
    pub unique: bool,
    pub default: Option<String>,
    pub foreign_key: Option<ForeignKey>,
}

#[derive(Clone, Debug)]
pub struct TableDef {
    pub name: String,
    pub columns: Vec<ColumnDef>,
    /// Primary key column names, in declared column order.
    pub primary_key: Vec<String>,
}

impl TableDef {
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Type of the first primary key column, whose value is reported after inserts.
    pub fn id_type(&self) -> ColumnType {
        self.primary_key
            .first()
            .and_then(|pk| self.column(pk))
            .map(|c| c.column_type)
            .unwrap_or(ColumnType::Integer)
    }

    /// SQLite aliases a lone INTEGER primary key to the rowid, which the engine assigns itself.
    pub fn is_rowid_alias(&self, column: &ColumnDef) -> bool {
        column.primary_key && self.primary_key.len() == 1 && column.column_type == ColumnType::Integer
    }
}

/// Immutable set of tables, built once at startup.
#[derive(Clone, Debug)]
pub struct SchemaRegistry {
    pub(crate) tables: Vec<Arc<TableDef>>,
    /// Indexes into `tables`, foreign key targets before the tables that reference them.
    pub(crate) creation_order: Vec<usize>,
    pub(crate) table_by_name: HashMap<String, usize>,
}

impl SchemaRegistry {
    /// Validate and resolve table definitions. Fails on duplicate table names and any other
    /// inconsistency; nothing is registered in that case.
    pub fn register_tables(tables: Vec<TableConfig>) -> Result<Self, ConfigError> {
        resolve(&tables)
    }

    /// Tables in declared order.
    pub fn tables(&self) -> &[Arc<TableDef>] {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&Arc<TableDef>> {
        self.table_by_name.get(name).map(|&i| &self.tables[i])
    }

    /// Tables in an order where every foreign key target precedes its referrers.
    pub fn creation_order(&self) -> impl Iterator<Item = &Arc<TableDef>> {
        self.creation_order.iter().map(move |&i| &self.tables[i])
    }

    /// Create every table that does not exist yet.
    pub async fn materialize(&self, pool: &SqlitePool, strict: bool) -> Result<(), StorageError> {
        crate::migration::materialize(pool, self, strict).await
    }
}
