use serde::Serialize;

use crate::api::V2Response;
use crate::database::models::{LinkType, NewUsefulLink, UsefulLink};
use crate::error::ApiError;
use crate::forms::LightAppCreation;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CreatedLightApp {
    pub bk_light_app_code: String,
}

/// Register a light app under an existing parent app. A blank introduction
/// falls back to the parent's.
pub async fn execute(
    state: &AppState,
    input: LightAppCreation,
) -> Result<V2Response<CreatedLightApp>, ApiError> {
    let parent = state
        .repository
        .find_app(&input.bk_app_code)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("app [{}] does not exist", input.bk_app_code)))?;

    let link = state
        .repository
        .create_link(NewUsefulLink {
            code: UsefulLink::generate_code(),
            name: input.bk_light_app_name,
            link: input.app_url,
            link_type: LinkType::Saas,
            introduction: input.introduction.unwrap_or(parent.introduction),
        })
        .await?;

    tracing::info!("Created light app {} under app {}", link.code, parent.code);

    Ok(V2Response::ok(
        "创建轻应用成功",
        CreatedLightApp {
            bk_light_app_code: link.code,
        },
    ))
}
