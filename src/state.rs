use std::sync::Arc;

use crate::config::{AppConfig, StorageBackend};
use crate::database::{DatabaseError, DatabaseManager, Fixture, MemoryRepository, PaasRepository, PgRepository};
use crate::middleware::EsbCredential;
use crate::storage::LogoStorage;

/// Shared, immutable handler state
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn PaasRepository>,
    pub logos: Arc<LogoStorage>,
    pub esb: Arc<EsbCredential>,
}

impl AppState {
    pub fn new(repository: Arc<dyn PaasRepository>, logos: LogoStorage, esb: EsbCredential) -> Self {
        Self {
            repository,
            logos: Arc::new(logos),
            esb: Arc::new(esb),
        }
    }

    /// Build the state described by the config, connecting to Postgres or
    /// seeding the in-memory repository
    pub async fn from_config(config: &AppConfig) -> Result<Self, DatabaseError> {
        let repository: Arc<dyn PaasRepository> = match config.database.backend {
            StorageBackend::Postgres => {
                let db = DatabaseManager::connect(&config.database).await?;
                Arc::new(PgRepository::new(db))
            }
            StorageBackend::Memory => {
                let fixture = match &config.database.fixture_path {
                    Some(path) => Fixture::load(path).await?,
                    None => Fixture::default(),
                };
                tracing::info!(
                    "Using in-memory repository with {} apps and {} links",
                    fixture.apps.len(),
                    fixture.useful_links.len()
                );
                Arc::new(MemoryRepository::from_fixture(fixture))
            }
        };

        Ok(Self::new(
            repository,
            LogoStorage::new(&config.media.root, config.media.max_logo_bytes),
            EsbCredential::new(&config.security.esb_token),
        ))
    }
}
