use super::types::Database;
use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Row counts reported by the `doctor` command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableCounts {
    pub recipes: i64,
    pub ingredients: i64,
    pub recipe_ingredients: i64,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database URL: {}", database_url))?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to {}", database_url))?;
        Self::from_pool(pool).await
    }

    /// Applies migrations to an existing pool
    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        sqlx::migrate!()
            .run(&pool)
            .await
            .context("Failed to apply database migrations")?;
        Ok(Self { pool })
    }

    pub async fn table_counts(&self) -> Result<TableCounts> {
        let recipes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM recipes")
            .fetch_one(&self.pool)
            .await?;
        let ingredients: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ingredients")
            .fetch_one(&self.pool)
            .await?;
        let recipe_ingredients: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM recipe_ingredients")
                .fetch_one(&self.pool)
                .await?;
        Ok(TableCounts {
            recipes,
            ingredients,
            recipe_ingredients,
        })
    }

    /// Test helper method to access the underlying pool
    #[cfg(test)]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
