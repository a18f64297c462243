//! Demo server: the users/addresses schema served by autogen-backend.
//!
//! Run from repo root: `cargo run -p example-consumer`
//! Set `SCHEMA_PATH=demos/schema.json` to load the tables from JSON instead.

use autogen_backend::{bootstrap, load_from_path, ColumnConfig, ColumnType, Settings, TableConfig};
use tokio::net::TcpListener;

fn demo_tables() -> Vec<TableConfig> {
    vec![
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
    ]
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("autogen_backend=info,example_consumer=info")
            }),
        )
        .init();

    let tables = match &settings.schema_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading schema");
            load_from_path(path).await?
        }
        None => demo_tables(),
    };

    let app = bootstrap(&settings, tables).await?;
    let listener = TcpListener::bind(settings.bind_addr).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
