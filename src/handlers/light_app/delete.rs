use crate::api::{Empty, V2Response};
use crate::error::ApiError;
use crate::forms::LightAppRemoval;
use crate::state::AppState;

use super::light_app_not_found;

/// Take a light app offline. The row is kept with `is_active = false`; repeating
/// the call on an inactive app succeeds.
pub async fn execute(state: &AppState, input: LightAppRemoval) -> Result<V2Response<Empty>, ApiError> {
    let mut link = state
        .repository
        .find_light_app(&input.bk_light_app_code)
        .await?
        .ok_or_else(|| light_app_not_found(&input.bk_light_app_code))?;

    link.is_active = false;
    state.repository.save_link(&link).await?;

    tracing::info!("Deactivated light app {}", link.code);
    Ok(V2Response::ok("app 下架成功", Empty {}))
}
