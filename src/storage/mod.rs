pub mod items;
pub mod models;
pub mod predictions;

pub use items::ItemStore;
pub use models::{Item, ItemPatch, NewItem, NewPrediction, Patch, Prediction};
pub use predictions::PredictionStore;

use crate::config::DatabaseConfig;
use anyhow::{Context, Result};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

/// Errors raised by the storage accessors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("row not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Open a connection pool for the configured database.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.url)
        .with_context(|| format!("invalid database url {}", config.url))?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
        .with_context(|| format!("connecting to {}", config.url))?;

    info!(url = %config.url, max_connections = config.max_connections, "Database pool ready");
    Ok(pool)
}

/// Create the tables when they do not exist yet.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS predictions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            file_name TEXT NOT NULL,
            prediction REAL NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use tempfile::TempDir;

    /// A pool over a fresh SQLite file with the schema applied.
    ///
    /// The directory guard must outlive the pool.
    pub async fn temp_pool() -> (TempDir, SqlitePool) {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            url: format!("sqlite://{}", dir.path().join("test.db").display()),
            max_connections: 2,
            init_schema: true,
        };
        let pool = connect(&config).await.unwrap();
        ensure_schema(&pool).await.unwrap();
        (dir, pool)
    }
}
