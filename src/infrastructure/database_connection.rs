// Database connection and pool management
// This module handles SQLite database connections using sqlx

use anyhow::{Context, Result};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use std::path::Path;

use crate::infrastructure::config::DatabaseConfig;

pub struct DatabaseConnection {
    pool: SqlitePool,
}

impl DatabaseConnection {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        if !is_in_memory(database_url) {
            // Create database file directory if it doesn't exist
            let db_path = database_url
                .trim_start_matches("sqlite://")
                .trim_start_matches("sqlite:");
            let db_path = db_path.split('?').next().unwrap_or(db_path);

            if let Some(parent) = Path::new(db_path).parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await.with_context(|| {
                        format!("Failed to create database directory {parent:?}")
                    })?;
                }
            }

            // Ensure the database file exists by creating it if necessary
            if !Path::new(db_path).exists() {
                std::fs::File::create(db_path)
                    .with_context(|| format!("Failed to create database file {db_path}"))?;
            }
        }

        let mut options = SqlitePoolOptions::new().max_connections(max_connections);
        if is_in_memory(database_url) {
            // Every connection to `sqlite::memory:` is its own database, and
            // retiring the only one would drop the schema with it
            options = options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = options
            .connect(database_url)
            .await
            .with_context(|| format!("Failed to connect to {database_url}"))?;

        Ok(Self { pool })
    }

    pub async fn from_config(config: &DatabaseConfig) -> Result<Self> {
        Self::new(&config.url, config.max_connections).await
    }

    /// Open a private in-memory database with the schema applied
    pub async fn in_memory() -> Result<Self> {
        let db = Self::new("sqlite::memory:", 1).await?;
        db.migrate().await?;
        Ok(db)
    }

    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn migrate(&self) -> Result<()> {
        let create_job_offers_sql = r"
            CREATE TABLE IF NOT EXISTS job_offers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                company TEXT NOT NULL,
                location TEXT NOT NULL,
                description TEXT NOT NULL,
                url TEXT NOT NULL UNIQUE,
                source TEXT NOT NULL,
                ingested_at TEXT NOT NULL
            )
        ";

        let create_indexes_sql = [
            "CREATE INDEX IF NOT EXISTS idx_job_offers_ingested_at ON job_offers (ingested_at)",
            "CREATE INDEX IF NOT EXISTS idx_job_offers_company ON job_offers (company)",
            "CREATE INDEX IF NOT EXISTS idx_job_offers_location ON job_offers (location)",
        ];

        sqlx::query(create_job_offers_sql).execute(&self.pool).await?;
        for sql in create_indexes_sql {
            sqlx::query(sql).execute(&self.pool).await?;
        }

        Ok(())
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}
