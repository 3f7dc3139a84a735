use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

use shared_config::AppConfig;

const SCHEMA: &str = include_str!("schema.sql");

/// Tables in drop order: appointments reference both patients and doctors.
const TABLES: [&str; 3] = ["appointments", "patients", "doctors"];

/// Connection pool to the clinic database.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect using the configured URL and make sure the schema exists.
    pub async fn connect(config: &AppConfig) -> Result<Self> {
        debug!("Connecting to database at {}", config.database_url);

        let options = SqliteConnectOptions::from_str(&config.database_url)
            .with_context(|| format!("Invalid DATABASE_URL {}", config.database_url))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect_with(options)
            .await
            .context("Failed to open database pool")?;

        let db = Self { pool };
        db.initialize_schema().await?;

        info!("Database ready ({} max connections)", config.database_max_connections);
        Ok(db)
    }

    /// Fresh private database living in memory.
    ///
    /// Each in-memory connection is its own database, so the pool is pinned to
    /// a single connection that is never recycled.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.initialize_schema().await?;

        Ok(db)
    }

    async fn initialize_schema(&self) -> Result<()> {
        // sqlx runs one statement per query on SQLite
        for statement in SCHEMA.split(';') {
            let trimmed = statement.trim();
            if !trimmed.is_empty() {
                sqlx::query(trimmed)
                    .execute(&self.pool)
                    .await
                    .with_context(|| format!("Failed to apply schema statement: {}", trimmed))?;
            }
        }

        Ok(())
    }

    /// Drop every clinic table.
    pub async fn reset(&self) -> Result<()> {
        for table in TABLES {
            sqlx::query(&format!("DROP TABLE IF EXISTS {}", table))
                .execute(&self.pool)
                .await
                .with_context(|| format!("Failed to drop table {}", table))?;
            info!("Dropped table {}", table);
        }

        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
