// handlers/app_info.rs - app registry listings (v1 and v2 envelopes)

use std::collections::BTreeSet;

use axum::extract::{RawQuery, State};
use serde::Serialize;

use crate::api::{BkV2Response, V1Response};
use crate::database::models::App;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct AppInfoQuery {
    /// App codes separated by `;`. Absent or empty selects every app.
    pub target_app_code: Option<String>,
    /// v2 only: extra fields separated by `;`
    pub fields: Option<String>,
}

impl AppInfoQuery {
    /// Parse the raw query string. A repeated key keeps its last value and
    /// unknown keys are ignored.
    pub fn parse(raw: Option<&str>) -> Self {
        let mut query = Self::default();
        for (key, value) in url::form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
            match key.as_ref() {
                "target_app_code" => query.target_app_code = Some(value.into_owned()),
                "fields" => query.fields = Some(value.into_owned()),
                _ => {}
            }
        }
        query
    }

    pub fn app_codes(&self) -> Option<Vec<String>> {
        split_list(self.target_app_code.as_deref())
    }

    /// Requested extra fields; unknown names are dropped
    pub fn extra_fields(&self) -> BTreeSet<ExtraField> {
        split_list(self.fields.as_deref())
            .unwrap_or_default()
            .iter()
            .filter_map(|name| name.parse().ok())
            .collect()
    }
}

fn split_list(raw: Option<&str>) -> Option<Vec<String>> {
    let raw = raw.filter(|s| !s.is_empty())?;
    Some(
        raw.split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

/// Optional per-app fields of the v2 listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ExtraField {
    Introduction,
    Creator,
    Developer,
}

impl std::str::FromStr for ExtraField {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "introduction" => Ok(ExtraField::Introduction),
            "creator" => Ok(ExtraField::Creator),
            "developer" => Ok(ExtraField::Developer),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct AppInfoItem {
    pub app_code: String,
    pub app_name: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct AppInfoV2Item {
    pub bk_app_code: String,
    pub bk_app_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub introduction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub developer: Option<String>,
}

impl AppInfoV2Item {
    fn project(app: App, fields: &BTreeSet<ExtraField>) -> Self {
        Self {
            introduction: fields.contains(&ExtraField::Introduction).then_some(app.introduction),
            creator: fields.contains(&ExtraField::Creator).then_some(app.creator),
            developer: fields.contains(&ExtraField::Developer).then_some(app.developer_str),
            bk_app_code: app.code,
            bk_app_name: app.name,
        }
    }
}

/// GET /paas/api/app_info/ - list apps, newest first
pub async fn app_info(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<V1Response<Vec<AppInfoItem>>, ApiError> {
    let query = AppInfoQuery::parse(raw.as_deref());
    let codes = query.app_codes();
    let apps = state.repository.list_apps(codes.as_deref()).await?;

    let data = apps
        .into_iter()
        .map(|app| AppInfoItem {
            app_code: app.code,
            app_name: app.name,
        })
        .collect();

    Ok(V1Response::ok("SUCCESS", data))
}

/// GET /paas/api/v2/app_info/ - list apps with optional extra fields
pub async fn app_info_v2(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<BkV2Response<Vec<AppInfoV2Item>>, ApiError> {
    let query = AppInfoQuery::parse(raw.as_deref());
    let codes = query.app_codes();
    let fields = query.extra_fields();
    let apps = state.repository.list_apps(codes.as_deref()).await?;

    let data = apps
        .into_iter()
        .map(|app| AppInfoV2Item::project(app, &fields))
        .collect();

    Ok(BkV2Response::ok(data))
}
