//! Config validation: names, keys and referential integrity.

use crate::config::{ColumnType, TableConfig};
use crate::error::ConfigError;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// Paths served by the fixed routes; a table may not shadow them.
pub const RESERVED_TABLE_NAMES: &[&str] = &["health", "ready", "version"];

fn identifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static regex"))
}

pub fn is_identifier(name: &str) -> bool {
    identifier_re().is_match(name)
}

/// Check every table on its own and every foreign key against its target.
/// Types are not checked here; type inheritance happens during resolution.
/// SQLite folds ASCII case in table and column names, so duplicates are compared folded.
pub fn validate(tables: &[TableConfig]) -> Result<(), ConfigError> {
    let mut columns_by_table: HashMap<&str, HashSet<&str>> = HashMap::new();
    let mut folded_tables = HashSet::new();

    for t in tables {
        if !is_identifier(&t.name) {
            return Err(ConfigError::InvalidIdentifier {
                kind: "table",
                name: t.name.clone(),
            });
        }
        if RESERVED_TABLE_NAMES.contains(&t.name.as_str()) {
            return Err(ConfigError::ReservedName(t.name.clone()));
        }
        if !folded_tables.insert(t.name.to_ascii_lowercase()) {
            return Err(ConfigError::DuplicateTable(t.name.clone()));
        }
        if t.columns.is_empty() {
            return Err(ConfigError::NoColumns(t.name.clone()));
        }

        let mut names = HashSet::new();
        let mut folded = HashSet::new();
        for c in &t.columns {
            if !is_identifier(&c.name) {
                return Err(ConfigError::InvalidIdentifier {
                    kind: "column",
                    name: format!("{}.{}", t.name, c.name),
                });
            }
            if !folded.insert(c.name.to_ascii_lowercase()) {
                return Err(ConfigError::DuplicateColumn {
                    table: t.name.clone(),
                    column: c.name.clone(),
                });
            }
            names.insert(c.name.as_str());
        }

        let pk_count = t.columns.iter().filter(|c| c.primary_key).count();
        if pk_count == 0 {
            return Err(ConfigError::MissingPrimaryKey(t.name.clone()));
        }

        let mut seen_autoincrement = false;
        for c in t.columns.iter().filter(|c| c.autoincrement) {
            let reason = if seen_autoincrement {
                Some("only one autoincrement column per table")
            } else if !c.primary_key {
                Some("column is not a primary key")
            } else if pk_count > 1 {
                Some("primary key is composite")
            } else if matches!(c.type_, Some(ty) if ty != ColumnType::Integer) {
                Some("column is not an integer")
            } else {
                None
            };
            if let Some(reason) = reason {
                return Err(ConfigError::InvalidAutoincrement {
                    table: t.name.clone(),
                    column: c.name.clone(),
                    reason,
                });
            }
            seen_autoincrement = true;
        }

        columns_by_table.insert(t.name.as_str(), names);
    }

    for t in tables {
        for c in &t.columns {
            let Some(fk) = &c.foreign_key else { continue };
            let target = columns_by_table
                .get(fk.table.as_str())
                .ok_or_else(|| ConfigError::MissingReference {
                    kind: "table",
                    id: fk.table.clone(),
                })?;
            if !target.contains(fk.column.as_str()) {
                return Err(ConfigError::MissingReference {
                    kind: "column",
                    id: format!("{}.{}", fk.table, fk.column),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnConfig;

    fn id() -> ColumnConfig {
        ColumnConfig::new("id", ColumnType::Integer).primary_key()
    }

    #[test]
    fn test_identifiers() {
        assert!(is_identifier("users"));
        assert!(is_identifier("_private_2"));
        assert!(!is_identifier("2fast"));
        assert!(!is_identifier("user-accounts"));
        assert!(!is_identifier("a b"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn test_duplicate_table_rejected() {
        let tables = vec![
            TableConfig::new("users", vec![id()]),
            TableConfig::new("users", vec![id()]),
        ];
        let err = validate(&tables).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateTable(ref name) if name == "users"));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let tables = vec![TableConfig::new(
            "users",
            vec![id(), ColumnConfig::new("id", ColumnType::String)],
        )];
        assert!(matches!(
            validate(&tables),
            Err(ConfigError::DuplicateColumn { .. })
        ));
    }

    #[test]
    fn test_names_differing_only_in_case_collide() {
        let tables = vec![
            TableConfig::new("users", vec![id()]),
            TableConfig::new("Users", vec![id()]),
        ];
        assert!(matches!(
            validate(&tables),
            Err(ConfigError::DuplicateTable(ref name)) if name == "Users"
        ));

        let tables = vec![TableConfig::new(
            "users",
            vec![id(), ColumnConfig::new("ID", ColumnType::Integer)],
        )];
        assert!(matches!(
            validate(&tables),
            Err(ConfigError::DuplicateColumn { ref column, .. }) if column == "ID"
        ));
    }

    #[test]
    fn test_reserved_name_rejected() {
        let tables = vec![TableConfig::new("health", vec![id()])];
        assert!(matches!(validate(&tables), Err(ConfigError::ReservedName(_))));
    }

    #[test]
    fn test_primary_key_required() {
        let tables = vec![TableConfig::new(
            "notes",
            vec![ColumnConfig::new("body", ColumnType::String)],
        )];
        assert!(matches!(
            validate(&tables),
            Err(ConfigError::MissingPrimaryKey(_))
        ));
    }

    #[test]
    fn test_autoincrement_rules() {
        let not_pk = vec![TableConfig::new(
            "t",
            vec![id(), ColumnConfig::new("n", ColumnType::Integer).autoincrement()],
        )];
        assert!(matches!(
            validate(&not_pk),
            Err(ConfigError::InvalidAutoincrement { reason: "column is not a primary key", .. })
        ));

        let text_pk = vec![TableConfig::new(
            "t",
            vec![ColumnConfig::new("code", ColumnType::String)
                .primary_key()
                .autoincrement()],
        )];
        assert!(matches!(
            validate(&text_pk),
            Err(ConfigError::InvalidAutoincrement { reason: "column is not an integer", .. })
        ));

        let composite = vec![TableConfig::new(
            "t",
            vec![
                id().autoincrement(),
                ColumnConfig::new("k", ColumnType::Integer).primary_key(),
            ],
        )];
        assert!(matches!(
            validate(&composite),
            Err(ConfigError::InvalidAutoincrement { reason: "primary key is composite", .. })
        ));
    }

    #[test]
    fn test_foreign_key_target_must_exist() {
        let tables = vec![TableConfig::new(
            "addresses",
            vec![id(), ColumnConfig::references("user_id", "users", "id")],
        )];
        assert!(matches!(
            validate(&tables),
            Err(ConfigError::MissingReference { kind: "table", .. })
        ));

        let tables = vec![
            TableConfig::new("users", vec![id()]),
            TableConfig::new(
                "addresses",
                vec![id(), ColumnConfig::references("user_id", "users", "uid")],
            ),
        ];
        assert!(matches!(
            validate(&tables),
            Err(ConfigError::MissingReference { kind: "column", .. })
        ));
    }
}
