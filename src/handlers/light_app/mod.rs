// handlers/light_app/mod.rs - light app management
//
// Four operations, each registered as its own (verb, path) route:
//   POST   /paas/api/v2/light_app/create_app/
//   PUT    /paas/api/v2/light_app/edit_app/
//   DELETE /paas/api/v2/light_app/del_app/
//   PUT    /paas/api/v2/light_app/modify_app_logo/

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    response::{IntoResponse, Response},
    routing::{on, MethodFilter, MethodRouter},
};
use serde_json::Value;

use crate::database::models::UsefulLink;
use crate::error::ApiError;
use crate::forms::{Form, LightAppCreation, LightAppEdition, LightAppLogoChange, LightAppRemoval, Params};
use crate::state::AppState;

pub mod create;
pub mod delete;
pub mod edit;
pub mod logo;

/// Route prefix shared by the light app operations
pub const LIGHT_APP_PREFIX: &str = "/paas/api/v2/light_app";

/// The light app operations and their routing contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Create,
    Edit,
    Delete,
    ChangeLogo,
}

impl OperationKind {
    pub const ALL: [OperationKind; 4] = [
        OperationKind::Create,
        OperationKind::Edit,
        OperationKind::Delete,
        OperationKind::ChangeLogo,
    ];

    pub fn path_segment(&self) -> &'static str {
        match self {
            OperationKind::Create => "create_app",
            OperationKind::Edit => "edit_app",
            OperationKind::Delete => "del_app",
            OperationKind::ChangeLogo => "modify_app_logo",
        }
    }

    pub fn method_filter(&self) -> MethodFilter {
        match self {
            OperationKind::Create => MethodFilter::POST,
            OperationKind::Edit | OperationKind::ChangeLogo => MethodFilter::PUT,
            OperationKind::Delete => MethodFilter::DELETE,
        }
    }

    /// Handler bound to this operation's verb; any other verb gets 405
    pub fn method_router(&self) -> MethodRouter<AppState> {
        let filter = self.method_filter();
        let router = match self {
            OperationKind::Create => on(filter, create_app),
            OperationKind::Edit => on(filter, edit_app),
            OperationKind::Delete => on(filter, del_app),
            OperationKind::ChangeLogo => on(filter, modify_app_logo),
        };
        router.fallback(method_not_allowed)
    }

    /// Full route path, with trailing slash
    pub fn route(&self) -> String {
        format!("{}/{}/", LIGHT_APP_PREFIX, self.path_segment())
    }

    /// Validate raw parameters into this operation's typed input
    pub fn validate(&self, params: &Params) -> Result<LightAppOperation, ApiError> {
        let operation = match self {
            OperationKind::Create => LightAppOperation::Create(LightAppCreation::clean(params)?),
            OperationKind::Edit => LightAppOperation::Edit(LightAppEdition::clean(params)?),
            OperationKind::Delete => LightAppOperation::Delete(LightAppRemoval::clean(params)?),
            OperationKind::ChangeLogo => {
                LightAppOperation::ChangeLogo(LightAppLogoChange::clean(params)?)
            }
        };
        Ok(operation)
    }
}

/// A validated light app operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LightAppOperation {
    Create(LightAppCreation),
    Edit(LightAppEdition),
    Delete(LightAppRemoval),
    ChangeLogo(LightAppLogoChange),
}

impl LightAppOperation {
    pub async fn execute(self, state: &AppState) -> Response {
        match self {
            LightAppOperation::Create(input) => create::execute(state, input).await.into_response(),
            LightAppOperation::Edit(input) => edit::execute(state, input).await.into_response(),
            LightAppOperation::Delete(input) => delete::execute(state, input).await.into_response(),
            LightAppOperation::ChangeLogo(input) => logo::execute(state, input).await.into_response(),
        }
    }
}

/// Parse the request body as a JSON object. Anything else yields no parameters,
/// so validation reports the missing fields.
pub fn parse_body(body: &[u8]) -> Params {
    if body.is_empty() {
        return Params::new();
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            tracing::debug!("Ignoring non-object request body: {}", other);
            Params::new()
        }
        Err(e) => {
            tracing::debug!("Ignoring malformed request body: {}", e);
            Params::new()
        }
    }
}

async fn run(state: &AppState, kind: OperationKind, body: Result<Bytes, BytesRejection>) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::warn!("Unreadable {} request body: {}", kind.path_segment(), rejection);
            return ApiError::from(rejection).into_response();
        }
    };

    let params = parse_body(&body);
    match kind.validate(&params) {
        Ok(operation) => operation.execute(state).await,
        Err(err) => {
            tracing::info!("Rejected {} request: {}", kind.path_segment(), err);
            err.into_response()
        }
    }
}

/// Resolve an active light app by code
pub(crate) async fn resolve_active(state: &AppState, code: &str) -> Result<UsefulLink, ApiError> {
    match state.repository.find_light_app(code).await? {
        Some(link) if link.is_active => Ok(link),
        _ => Err(light_app_not_found(code)),
    }
}

pub(crate) fn light_app_not_found(code: &str) -> ApiError {
    ApiError::not_found(format!("light app [{}] does not exist", code))
}

/// POST /paas/api/v2/light_app/create_app/
pub async fn create_app(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    run(&state, OperationKind::Create, body).await
}

/// PUT /paas/api/v2/light_app/edit_app/
pub async fn edit_app(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    run(&state, OperationKind::Edit, body).await
}

/// DELETE /paas/api/v2/light_app/del_app/
pub async fn del_app(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    run(&state, OperationKind::Delete, body).await
}

/// PUT /paas/api/v2/light_app/modify_app_logo/
pub async fn modify_app_logo(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    run(&state, OperationKind::ChangeLogo, body).await
}

/// Unsupported verb or unknown operation segment
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
