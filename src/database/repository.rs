use async_trait::async_trait;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{App, LinkType, NewUsefulLink, UsefulLink};

/// Persistence seam used by the handlers.
///
/// Lookups return `Ok(None)` when no row matches; callers decide how a missing
/// record is reported to the client.
#[async_trait]
pub trait PaasRepository: Send + Sync {
    /// Apps ordered by creation time, newest first. `codes = None` selects all apps.
    async fn list_apps(&self, codes: Option<&[String]>) -> Result<Vec<App>, DatabaseError>;

    async fn find_app(&self, code: &str) -> Result<Option<App>, DatabaseError>;

    async fn create_link(&self, link: NewUsefulLink) -> Result<UsefulLink, DatabaseError>;

    /// SAAS-type link with the given code, active or not
    async fn find_light_app(&self, code: &str) -> Result<Option<UsefulLink>, DatabaseError>;

    /// Persist the mutable columns of an existing link
    async fn save_link(&self, link: &UsefulLink) -> Result<(), DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;

    /// Release backend resources on shutdown
    async fn close(&self) {}
}

const APP_COLUMNS: &str = "code, name, introduction, creater AS creator, developer AS developer_str, created_date";
const LINK_COLUMNS: &str = "id, code, name, link, link_type, introduction, logo, is_active, created_at";

/// Postgres-backed repository over `paas_app` and `paas_usefullinks`
pub struct PgRepository {
    db: DatabaseManager,
}

impl PgRepository {
    pub fn new(db: DatabaseManager) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PaasRepository for PgRepository {
    async fn list_apps(&self, codes: Option<&[String]>) -> Result<Vec<App>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM paas_app WHERE ($1::text[] IS NULL OR code = ANY($1)) ORDER BY created_date DESC",
            APP_COLUMNS
        );
        let apps = sqlx::query_as::<_, App>(&sql)
            .bind(codes.map(|c| c.to_vec()))
            .fetch_all(self.db.pool())
            .await?;
        Ok(apps)
    }

    async fn find_app(&self, code: &str) -> Result<Option<App>, DatabaseError> {
        let sql = format!("SELECT {} FROM paas_app WHERE code = $1", APP_COLUMNS);
        let app = sqlx::query_as::<_, App>(&sql)
            .bind(code)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(app)
    }

    async fn create_link(&self, link: NewUsefulLink) -> Result<UsefulLink, DatabaseError> {
        let sql = format!(
            "INSERT INTO paas_usefullinks (code, name, link, link_type, introduction, is_active, created_at)
             VALUES ($1, $2, $3, $4, $5, true, NOW())
             RETURNING {}",
            LINK_COLUMNS
        );
        let created = sqlx::query_as::<_, UsefulLink>(&sql)
            .bind(&link.code)
            .bind(&link.name)
            .bind(&link.link)
            .bind(link.link_type.as_str())
            .bind(&link.introduction)
            .fetch_one(self.db.pool())
            .await?;
        Ok(created)
    }

    async fn find_light_app(&self, code: &str) -> Result<Option<UsefulLink>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM paas_usefullinks WHERE code = $1 AND link_type = $2",
            LINK_COLUMNS
        );
        let link = sqlx::query_as::<_, UsefulLink>(&sql)
            .bind(code)
            .bind(LinkType::Saas.as_str())
            .fetch_optional(self.db.pool())
            .await?;
        Ok(link)
    }

    async fn save_link(&self, link: &UsefulLink) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE paas_usefullinks
             SET name = $2, link = $3, introduction = $4, logo = $5, is_active = $6
             WHERE id = $1",
        )
        .bind(link.id)
        .bind(&link.name)
        .bind(&link.link)
        .bind(&link.introduction)
        .bind(&link.logo)
        .bind(link.is_active)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::QueryError(format!(
                "useful link {} vanished before save",
                link.code
            )));
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.db.health_check().await
    }

    async fn close(&self) {
        self.db.close().await;
    }
}
