//! Process settings read from the environment (a `.env` file is honored).

use crate::error::ConfigError;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:///tmp/test.db";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 1024 * 1024;

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// JSON schema file; the caller supplies its own tables when unset.
    pub schema_path: Option<PathBuf>,
    pub max_connections: u32,
    /// Create STRICT tables, so SQLite rejects values of the wrong type.
    pub strict_tables: bool,
    pub body_limit_bytes: usize,
}

impl Settings {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; unset keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        Ok(Settings {
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
            bind_addr: parse("BIND_ADDR", &bind_addr)?,
            schema_path: get("SCHEMA_PATH").map(PathBuf::from),
            max_connections: get("DB_MAX_CONNECTIONS")
                .map(|v| parse("DB_MAX_CONNECTIONS", &v))
                .transpose()?
                .unwrap_or(DEFAULT_MAX_CONNECTIONS),
            strict_tables: get("SQLITE_STRICT")
                .map(|v| parse_bool("SQLITE_STRICT", &v))
                .transpose()?
                .unwrap_or(false),
            body_limit_bytes: get("BODY_LIMIT_BYTES")
                .map(|v| parse("BODY_LIMIT_BYTES", &v))
                .transpose()?
                .unwrap_or(DEFAULT_BODY_LIMIT_BYTES),
        })
    }
}

fn parse<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Env {
        key,
        message: format!("'{}': {}", value, e),
    })
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Env {
            key,
            message: format!("'{}' is not a boolean", value),
        }),
    }
}
