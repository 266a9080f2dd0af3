use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::StoreConfig;

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 5,
            acquire_timeout_secs: 30,
        }
    }
}

impl DatabaseConfig {
    pub fn from_store_config(store: &StoreConfig) -> Self {
        Self {
            url: store.database_url.clone(),
            max_connections: store.pool_max_connections,
            acquire_timeout_secs: store.acquire_timeout_secs,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(#[from] sqlx::Error),

    #[error("Invalid database configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Builds the pool without opening a connection; the first query connects.
    pub fn connect_lazy(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let pool = Self::pool_options(config)?.connect_lazy(&config.url)?;
        debug!("Database pool created (lazy)");
        Ok(Self { pool })
    }

    fn pool_options(config: &DatabaseConfig) -> Result<PgPoolOptions, DatabaseError> {
        if config.url.is_empty() {
            return Err(DatabaseError::InvalidConfig(
                "database URL is empty".to_string(),
            ));
        }
        if config.max_connections == 0 {
            return Err(DatabaseError::InvalidConfig(
                "max_connections must be greater than 0".to_string(),
            ));
        }

        Ok(PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs)))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn close(&self) {
        info!("Closing database connection pool...");
        self.pool.close().await;
        info!("Database connection pool closed");
    }
}
