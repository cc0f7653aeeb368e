//! Database connection pool management

use sqlx::{
    mysql::{MySqlConnectOptions, MySqlPoolOptions},
    MySqlPool,
};
use std::str::FromStr;
use std::time::Duration;

use cv_shared::config::DatabaseConfig;

use crate::InfrastructureError;

const USER_PROFILES_SCHEMA: &str = include_str!("../../migrations/001_create_user_profiles.sql");

/// MySQL connection pool wrapper
#[derive(Clone)]
pub struct DatabasePool {
    pool: MySqlPool,
}

impl DatabasePool {
    /// Create a new database connection pool
    pub async fn new(config: &DatabaseConfig) -> Result<Self, InfrastructureError> {
        tracing::info!(
            event = "database_connecting",
            max_connections = config.max_connections,
            "Creating database connection pool"
        );

        let connect_options = MySqlConnectOptions::from_str(&config.url)
            .map_err(|e| InfrastructureError::Config(format!("Invalid database URL: {}", e)))?;

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(config.connect_timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .test_before_acquire(true)
            .connect_with(connect_options)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create database pool: {}", e);
                InfrastructureError::Database(e)
            })?;

        tracing::info!(event = "database_connected", "Database connection pool created successfully");

        Ok(Self { pool })
    }

    pub fn get_pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Create the profile table when it does not exist yet
    pub async fn ensure_schema(&self) -> Result<(), InfrastructureError> {
        tracing::info!("Ensuring database schema");
        sqlx::query(USER_PROFILES_SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    /// Check connectivity with a trivial query
    pub async fn health_check(&self) -> Result<(), InfrastructureError> {
        sqlx::query("SELECT 1").execute(&self.pool).await.map_err(|e| {
            tracing::error!("Database health check failed: {}", e);
            InfrastructureError::Database(e)
        })?;
        Ok(())
    }

    /// Close all connections; call during shutdown
    pub async fn close(&self) {
        tracing::info!("Closing database connection pool");
        self.pool.close().await;
    }
}
