//! Build the schema registry from raw table configs, or load those configs from a JSON file.

use crate::config::resolved::{ColumnDef, ForeignKey, SchemaRegistry, TableDef};
use crate::config::types::*;
use crate::config::validate;
use crate::error::ConfigError;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Validate, resolve inherited column types and compute the creation order.
pub fn resolve(tables: &[TableConfig]) -> Result<SchemaRegistry, ConfigError> {
    validate(tables)?;

    let configs_by_table: HashMap<&str, &TableConfig> =
        tables.iter().map(|t| (t.name.as_str(), t)).collect();

    let mut resolved = Vec::with_capacity(tables.len());
    for t in tables {
        let columns = t
            .columns
            .iter()
            .map(|c| {
                let column_type = column_type(&configs_by_table, t, c)?;
                Ok::<_, ConfigError>(ColumnDef {
                    name: c.name.clone(),
                    column_type,
                    nullable: c.nullable && !c.primary_key,
                    primary_key: c.primary_key,
                    autoincrement: c.autoincrement,
                    unique: c.unique,
                    default: c.default.clone(),
                    foreign_key: c.foreign_key.as_ref().map(|fk| ForeignKey {
                        table: fk.table.clone(),
                        column: fk.column.clone(),
                    }),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(c) = columns
            .iter()
            .find(|c| c.autoincrement && c.column_type != ColumnType::Integer)
        {
            return Err(ConfigError::InvalidAutoincrement {
                table: t.name.clone(),
                column: c.name.clone(),
                reason: "column is not an integer",
            });
        }

        let primary_key = columns
            .iter()
            .filter(|c| c.primary_key)
            .map(|c| c.name.clone())
            .collect();
        resolved.push(TableDef {
            name: t.name.clone(),
            columns,
            primary_key,
        });
    }

    let table_by_name: HashMap<String, usize> = resolved
        .iter()
        .enumerate()
        .map(|(i, t)| (t.name.clone(), i))
        .collect();
    let creation_order = creation_order(&resolved, &table_by_name)?;

    Ok(SchemaRegistry {
        tables: resolved.into_iter().map(Arc::new).collect(),
        creation_order,
        table_by_name,
    })
}

/// Declared type, or the type of the referenced column, following chains of untyped foreign keys.
fn column_type(
    configs_by_table: &HashMap<&str, &TableConfig>,
    table: &TableConfig,
    column: &ColumnConfig,
) -> Result<ColumnType, ConfigError> {
    let missing = || ConfigError::MissingType {
        table: table.name.clone(),
        column: column.name.clone(),
    };
    let mut current = column;
    // A chain can visit each column at most once before it loops.
    let max_hops: usize = configs_by_table.values().map(|t| t.columns.len()).sum();
    for _ in 0..=max_hops {
        if let Some(ty) = current.type_ {
            return Ok(ty);
        }
        let fk = current.foreign_key.as_ref().ok_or_else(missing)?;
        current = configs_by_table
            .get(fk.table.as_str())
            .and_then(|t| t.columns.iter().find(|c| c.name == fk.column))
            .ok_or_else(missing)?;
    }
    Err(missing())
}

/// Kahn's algorithm over foreign keys between distinct tables; ties keep declared order.
fn creation_order(
    tables: &[TableDef],
    table_by_name: &HashMap<String, usize>,
) -> Result<Vec<usize>, ConfigError> {
    let mut pending: Vec<Vec<usize>> = tables
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let mut deps: Vec<usize> = t
                .columns
                .iter()
                .filter_map(|c| c.foreign_key.as_ref())
                .filter_map(|fk| table_by_name.get(&fk.table).copied())
                .filter(|&dep| dep != i)
                .collect();
            deps.sort_unstable();
            deps.dedup();
            deps
        })
        .collect();

    let mut order = Vec::with_capacity(tables.len());
    let mut placed = vec![false; tables.len()];
    while order.len() < tables.len() {
        let next = (0..tables.len()).find(|&i| !placed[i] && pending[i].is_empty());
        let Some(next) = next else {
            let stuck: Vec<&str> = (0..tables.len())
                .filter(|&i| !placed[i])
                .map(|i| tables[i].name.as_str())
                .collect();
            return Err(ConfigError::ForeignKeyCycle(stuck.join(", ")));
        };
        placed[next] = true;
        order.push(next);
        for deps in pending.iter_mut() {
            deps.retain(|&d| d != next);
        }
    }
    Ok(order)
}

/// Read a JSON array of table configs.
pub async fn load_from_path(path: impl AsRef<Path>) -> Result<Vec<TableConfig>, ConfigError> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&text).map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))
}
