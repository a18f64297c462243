//! autogen-backend: a CRUD HTTP backend generated from declarative table definitions.

pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod migration;
pub mod response;
pub mod routes;
pub mod service;
pub mod settings;
pub mod sql;
pub mod state;
pub mod store;

pub use app::{bootstrap, build_router};
pub use config::{
    load_from_path, ColumnConfig, ColumnDef, ColumnType, ForeignKeyConfig, SchemaRegistry,
    TableConfig, TableDef,
};
pub use error::{AppError, ConfigError, StorageError};
pub use migration::materialize;
pub use routes::{common_routes, table_routes};
pub use service::CrudService;
pub use settings::Settings;
pub use state::AppState;
pub use store::connect;
