use std::{future::Future, time::Duration};

use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions, Pool, Sqlite};
use tracing::info;

use crate::error::{AppError, Result};

/// Shared connection pool plus the deadline applied to every store call.
#[derive(Clone)]
pub struct Database {
    pub pool: Pool<Sqlite>,
    query_timeout: Duration,
}

impl Database {
    pub async fn connect(url: &str, max_connections: u32, query_timeout: Duration) -> Result<Self> {
        // Check if the database exists, if not, create it
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            info!("creating database {}", url);
            Sqlite::create_database(url).await?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(query_timeout)
            .connect(url)
            .await?;
        info!("connection to the database is successful");

        let db = Self {
            pool,
            query_timeout,
        };
        db.create_tables().await?;
        Ok(db)
    }

    /// Single-connection in-memory database, so every query sees the same tables.
    #[cfg(test)]
    pub async fn in_memory() -> Self {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite");
        let db = Self {
            pool,
            query_timeout: Duration::from_secs(5),
        };
        db.create_tables().await.expect("create tables");
        db
    }

    async fn create_tables(&self) -> Result<()> {
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL
        );"#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS todos (
            todo_id INTEGER PRIMARY KEY AUTOINCREMENT,
            owner_id INTEGER NOT NULL REFERENCES users(id),
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            UNIQUE (owner_id, title)
        );"#,
        )
        .execute(&self.pool)
        .await?;

        info!("tables ready");
        Ok(())
    }

    /// Runs a store call under the query deadline. Expiry is reported, not retried.
    pub async fn run<T, E, F>(&self, call: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, E>>,
        E: Into<AppError>,
    {
        match tokio::time::timeout(self.query_timeout, call).await {
            Ok(result) => result.map_err(Into::into),
            Err(_) => Err(AppError::Timeout),
        }
    }
}
