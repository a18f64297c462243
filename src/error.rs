//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::response::msg_response;

/// Schema registration and settings errors. All of them abort startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("duplicate table: {0}")]
    DuplicateTable(String),
    #[error("duplicate column: {table}.{column}")]
    DuplicateColumn { table: String, column: String },
    #[error("invalid {kind} name: '{name}'")]
    InvalidIdentifier { kind: &'static str, name: String },
    #[error("table name '{0}' collides with a fixed route")]
    ReservedName(String),
    #[error("table {0} has no columns")]
    NoColumns(String),
    #[error("table {0} has no primary key")]
    MissingPrimaryKey(String),
    #[error("invalid autoincrement on {table}.{column}: {reason}")]
    InvalidAutoincrement {
        table: String,
        column: String,
        reason: &'static str,
    },
    #[error("missing reference: {kind} '{id}'")]
    MissingReference { kind: &'static str, id: String },
    #[error("column {table}.{column} has no type and no foreign key to inherit one from")]
    MissingType { table: String, column: String },
    #[error("foreign key cycle between tables: {0}")]
    ForeignKeyCycle(String),
    #[error("schema load: {0}")]
    Load(String),
    #[error("invalid value for {key}: {message}")]
    Env { key: &'static str, message: String },
}

/// Failures while opening the store or materializing the schema.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("table {table} exists with columns [{found}], expected [{expected}]")]
    IncompatibleTable {
        table: String,
        expected: String,
        found: String,
    },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// Any failure while handling a write. The message is shown to the client as-is.
    #[error("{0}")]
    Insert(String),
    #[error("query: {0}")]
    Query(#[source] sqlx::Error),
}

impl AppError {
    /// Wrap an engine error raised on the write path, keeping the engine's own text.
    pub fn insert(err: sqlx::Error) -> Self {
        let msg = match &err {
            sqlx::Error::Database(db) => db.message().to_string(),
            other => other.to_string(),
        };
        AppError::Insert(msg)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Insert(msg) => msg_response(StatusCode::BAD_REQUEST, msg),
            other => {
                tracing::error!(error = %other, "request failed");
                msg_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        }
    }
}
