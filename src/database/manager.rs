use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from the persistence layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Fixture error: {0}")]
    Fixture(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Owns the Postgres connection pool
#[derive(Clone)]
pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    /// Connect using the database section of the app config
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let url = config
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;

        let parsed = url::Url::parse(url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        if !matches!(parsed.scheme(), "postgres" | "postgresql") {
            return Err(DatabaseError::InvalidDatabaseUrl);
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        info!(
            "Created database pool for: {}",
            parsed.path().trim_start_matches('/')
        );
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close the pool (e.g., on shutdown)
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageBackend;

    fn config_with_url(url: Option<&str>) -> DatabaseConfig {
        DatabaseConfig {
            backend: StorageBackend::Postgres,
            url: url.map(str::to_string),
            fixture_path: None,
            max_connections: 1,
            connection_timeout: 1,
        }
    }

    #[tokio::test]
    async fn missing_url_is_a_config_error() {
        let err = DatabaseManager::connect(&config_with_url(None)).await.err();
        assert!(matches!(err, Some(DatabaseError::ConfigMissing("DATABASE_URL"))));
    }

    #[tokio::test]
    async fn rejects_non_postgres_urls() {
        let err = DatabaseManager::connect(&config_with_url(Some("mysql://localhost/paas")))
            .await
            .err();
        assert!(matches!(err, Some(DatabaseError::InvalidDatabaseUrl)));
    }
}
