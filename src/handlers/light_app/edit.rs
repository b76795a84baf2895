use crate::api::{Empty, V2Response};
use crate::error::ApiError;
use crate::forms::LightAppEdition;
use crate::state::AppState;

use super::resolve_active;

/// Update the supplied fields of an active light app, leaving the rest untouched
pub async fn execute(state: &AppState, input: LightAppEdition) -> Result<V2Response<Empty>, ApiError> {
    let mut link = resolve_active(state, &input.bk_light_app_code).await?;

    if let Some(introduction) = input.introduction {
        link.introduction = introduction;
    }
    if let Some(name) = input.bk_light_app_name {
        link.name = name;
    }
    if let Some(url) = input.app_url {
        link.link = url;
    }
    state.repository.save_link(&link).await?;

    tracing::info!("Edited light app {}", link.code);
    Ok(V2Response::ok("app 修改成功", Empty {}))
}
