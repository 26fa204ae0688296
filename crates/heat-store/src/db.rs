use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

const DEFAULT_DATABASE_URL: &str = "sqlite:heatwatch.db";

#[derive(Clone)]
pub struct HeatDb {
    pool: SqlitePool,
}

impl HeatDb {
    /// Open the database and apply the schema
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.init_schema().await?;

        Ok(db)
    }

    /// Open the database named by DATABASE_URL, defaulting to a local file
    pub async fn from_env() -> Result<Self> {
        let url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        Self::new(&url).await
    }

    // sqlx executes one statement per query, so the schema file is split on ';'
    async fn init_schema(&self) -> Result<()> {
        let schema = include_str!("../../../schema.sql");

        for statement in schema.split(';') {
            let stmt = statement.trim();
            if !stmt.is_empty() {
                sqlx::query(stmt).execute(&self.pool).await?;
            }
        }

        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
