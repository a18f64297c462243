//! Raw table definitions as written by callers, in Rust or in a JSON schema file.

use serde::{Deserialize, Deserializer, Serialize};

/// Scalar type tag of a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[serde(alias = "int")]
    Integer,
    #[serde(alias = "real")]
    Float,
    #[serde(alias = "text")]
    String,
    #[serde(alias = "bool")]
    Boolean,
    #[serde(alias = "timestamp")]
    DateTime,
}

/// Foreign key target: `table.column`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ForeignKeyConfig {
    pub table: String,
    pub column: String,
}

impl ForeignKeyConfig {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        ForeignKeyConfig {
            table: table.into(),
            column: column.into(),
        }
    }
}

impl<'de> Deserialize<'de> for ForeignKeyConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = serde_json::Value::deserialize(deserializer)?;
        match v {
            serde_json::Value::String(s) => match s.split_once('.') {
                Some((table, column)) if !table.is_empty() && !column.is_empty() => {
                    Ok(ForeignKeyConfig::new(table, column))
                }
                _ => Err(serde::de::Error::custom(format!(
                    "foreign key must look like \"table.column\"; got \"{}\"",
                    s
                ))),
            },
            serde_json::Value::Object(mut obj) => {
                let table = obj.remove("table");
                let column = obj.remove("column");
                match (table, column) {
                    (Some(serde_json::Value::String(t)), Some(serde_json::Value::String(c))) => {
                        Ok(ForeignKeyConfig::new(t, c))
                    }
                    _ => Err(serde::de::Error::custom(
                        "foreign key object needs string fields \"table\" and \"column\"",
                    )),
                }
            }
            _ => Err(serde::de::Error::custom(
                "foreign key must be \"table.column\" or { \"table\": ..., \"column\": ... }",
            )),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub name: String,
    /// May be omitted on foreign key columns; the referenced column's type is used.
    #[serde(default, rename = "type")]
    pub type_: Option<ColumnType>,
    #[serde(default = "default_true")]
    pub nullable: bool,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub autoincrement: bool,
    #[serde(default)]
    pub unique: bool,
    /// SQL expression used as the column default, e.g. `0` or `CURRENT_TIMESTAMP`.
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub foreign_key: Option<ForeignKeyConfig>,
}

fn default_true() -> bool {
    true
}

impl ColumnConfig {
    pub fn new(name: impl Into<String>, type_: ColumnType) -> Self {
        ColumnConfig {
            name: name.into(),
            type_: Some(type_),
            nullable: true,
            primary_key: false,
            autoincrement: false,
            unique: false,
            default: None,
            foreign_key: None,
        }
    }

    /// Column referencing `table.column`; its type is taken from the target.
    pub fn references(
        name: impl Into<String>,
        table: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        ColumnConfig {
            type_: None,
            foreign_key: Some(ForeignKeyConfig::new(table, column)),
            ..ColumnConfig::new(name, ColumnType::Integer)
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn autoincrement(mut self) -> Self {
        self.autoincrement = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn default_expr(mut self, expr: impl Into<String>) -> Self {
        self.default = Some(expr.into());
        self
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TableConfig {
    pub name: String,
    pub columns: Vec<ColumnConfig>,
}

impl TableConfig {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnConfig>) -> Self {
        TableConfig {
            name: name.into(),
            columns,
        }
    }
}
