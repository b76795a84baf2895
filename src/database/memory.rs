use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::{App, LinkType, NewUsefulLink, UsefulLink};
use crate::database::repository::PaasRepository;

/// Seed data for the in-memory repository
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub apps: Vec<App>,
    #[serde(default)]
    pub useful_links: Vec<UsefulLink>,
}

impl Fixture {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DatabaseError::Fixture(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&raw)
            .map_err(|e| DatabaseError::Fixture(format!("{}: {}", path.display(), e)))
    }
}

/// In-process repository for development and tests
pub struct MemoryRepository {
    apps: RwLock<Vec<App>>,
    links: RwLock<HashMap<String, UsefulLink>>,
    next_id: AtomicI64,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::from_fixture(Fixture::default())
    }

    pub fn from_fixture(fixture: Fixture) -> Self {
        let next_id = fixture.useful_links.iter().map(|l| l.id).max().unwrap_or(0) + 1;
        let links = fixture
            .useful_links
            .into_iter()
            .map(|link| (link.code.clone(), link))
            .collect();

        Self {
            apps: RwLock::new(fixture.apps),
            links: RwLock::new(links),
            next_id: AtomicI64::new(next_id),
        }
    }

    /// Snapshot of a link regardless of type, for assertions
    pub async fn link(&self, code: &str) -> Option<UsefulLink> {
        self.links.read().await.get(code).cloned()
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaasRepository for MemoryRepository {
    async fn list_apps(&self, codes: Option<&[String]>) -> Result<Vec<App>, DatabaseError> {
        let apps = self.apps.read().await;
        let mut selected: Vec<App> = apps
            .iter()
            .filter(|app| codes.map_or(true, |codes| codes.contains(&app.code)))
            .cloned()
            .collect();
        selected.sort_by(|a, b| b.created_date.cmp(&a.created_date));
        Ok(selected)
    }

    async fn find_app(&self, code: &str) -> Result<Option<App>, DatabaseError> {
        let apps = self.apps.read().await;
        Ok(apps.iter().find(|app| app.code == code).cloned())
    }

    async fn create_link(&self, link: NewUsefulLink) -> Result<UsefulLink, DatabaseError> {
        let mut links = self.links.write().await;
        if links.contains_key(&link.code) {
            return Err(DatabaseError::QueryError(format!(
                "duplicate useful link code {}",
                link.code
            )));
        }

        let created = UsefulLink {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            code: link.code,
            name: link.name,
            link: link.link,
            link_type: link.link_type,
            introduction: link.introduction,
            logo: None,
            is_active: true,
            created_at: Utc::now(),
        };
        links.insert(created.code.clone(), created.clone());
        Ok(created)
    }

    async fn find_light_app(&self, code: &str) -> Result<Option<UsefulLink>, DatabaseError> {
        let links = self.links.read().await;
        Ok(links
            .get(code)
            .filter(|link| link.link_type == LinkType::Saas)
            .cloned())
    }

    async fn save_link(&self, link: &UsefulLink) -> Result<(), DatabaseError> {
        let mut links = self.links.write().await;
        match links.get_mut(&link.code) {
            Some(stored) if stored.id == link.id => {
                stored.name = link.name.clone();
                stored.link = link.link.clone();
                stored.introduction = link.introduction.clone();
                stored.logo = link.logo.clone();
                stored.is_active = link.is_active;
                Ok(())
            }
            _ => Err(DatabaseError::QueryError(format!(
                "useful link {} vanished before save",
                link.code
            ))),
        }
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
