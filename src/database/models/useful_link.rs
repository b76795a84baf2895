use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};
use uuid::Uuid;

/// Kind of a useful link. Light apps are always `Saas`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    Common,
    Saas,
}

impl LinkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkType::Common => "common",
            LinkType::Saas => "saas",
        }
    }
}

impl std::str::FromStr for LinkType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "common" => Ok(LinkType::Common),
            "saas" => Ok(LinkType::Saas),
            other => Err(format!("unknown link type '{}'", other)),
        }
    }
}

/// Row of the generic useful links table, also used to store light apps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsefulLink {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub link: String,
    pub link_type: LinkType,
    #[serde(default)]
    pub introduction: String,
    /// Path of the stored logo file, relative to the media root
    #[serde(default)]
    pub logo: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl UsefulLink {
    /// Generate a fresh light app code: `light_` + 16 hex chars
    pub fn generate_code() -> String {
        let hex = Uuid::new_v4().simple().to_string();
        format!("light_{}", &hex[..16])
    }
}

impl<'r> FromRow<'r, PgRow> for UsefulLink {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let link_type: String = row.try_get("link_type")?;
        let link_type = link_type
            .parse::<LinkType>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "link_type".to_string(),
                source: e.into(),
            })?;

        Ok(Self {
            id: row.try_get("id")?,
            code: row.try_get("code")?,
            name: row.try_get("name")?,
            link: row.try_get("link")?,
            link_type,
            introduction: row.try_get("introduction")?,
            logo: row.try_get("logo")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// Values for inserting a new link; id and timestamps come from the store
#[derive(Debug, Clone)]
pub struct NewUsefulLink {
    pub code: String,
    pub name: String,
    pub link: String,
    pub link_type: LinkType,
    pub introduction: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_are_prefixed_and_unique() {
        let a = UsefulLink::generate_code();
        let b = UsefulLink::generate_code();
        assert!(a.starts_with("light_"));
        assert_eq!(a.len(), "light_".len() + 16);
        assert_ne!(a, b);
    }

    #[test]
    fn link_type_text_mapping() {
        assert_eq!(LinkType::Saas.as_str(), "saas");
        assert_eq!("common".parse::<LinkType>(), Ok(LinkType::Common));
        assert!("SAAS".parse::<LinkType>().is_err());
    }
}
