use crate::api::{Empty, V2Response};
use crate::error::ApiError;
use crate::forms::LightAppLogoChange;
use crate::state::AppState;

use super::resolve_active;

pub const INVALID_LOGO_MESSAGE: &str = "logo 数据格式不合法";

/// Replace a light app's logo with the decoded base64 image.
///
/// Decode, storage and save failures are all answered with the same
/// validation failure; the cause is only logged.
pub async fn execute(state: &AppState, input: LightAppLogoChange) -> Result<V2Response<Empty>, ApiError> {
    let mut link = resolve_active(state, &input.bk_light_app_code).await?;

    let stored = match state.logos.save(&input.logo).await {
        Ok(path) => path,
        Err(e) => {
            tracing::error!("save app logo fail: {}", e);
            return Err(ApiError::validation_error(INVALID_LOGO_MESSAGE));
        }
    };

    link.logo = Some(stored.clone());
    if let Err(e) = state.repository.save_link(&link).await {
        tracing::error!("save app logo fail: {}", e);
        if let Err(e) = state.logos.remove(&stored).await {
            tracing::warn!("failed to remove orphaned logo {}: {}", stored, e);
        }
        return Err(ApiError::validation_error(INVALID_LOGO_MESSAGE));
    }

    tracing::info!("Changed logo of light app {} to {}", link.code, stored);
    Ok(V2Response::ok("app logo修改成功", Empty {}))
}
