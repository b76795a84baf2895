use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Platform-hosted application, read-only from this service
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct App {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub introduction: String,
    #[serde(default)]
    pub creator: String,
    /// Developers joined with `;`
    #[serde(default)]
    pub developer_str: String,
    pub created_date: DateTime<Utc>,
}
