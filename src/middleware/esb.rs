use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use sha2::{Digest, Sha256};

use crate::api::V1Response;
use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the shared gateway credential
pub const ESB_TOKEN_HEADER: &str = "x-esb-token";

/// Shared credential expected from the API gateway.
///
/// Only the SHA-256 digest is kept; presented tokens are hashed before comparison
/// so the comparison time does not depend on the token length.
#[derive(Debug, Clone)]
pub struct EsbCredential {
    digest: Option<[u8; 32]>,
}

impl EsbCredential {
    /// An empty token leaves the credential unconfigured: every request is rejected
    pub fn new(token: &str) -> Self {
        let digest = (!token.is_empty()).then(|| sha256(token));
        Self { digest }
    }

    pub fn is_configured(&self) -> bool {
        self.digest.is_some()
    }

    pub fn verify(&self, presented: &str) -> bool {
        let Some(expected) = self.digest else {
            return false;
        };
        let presented = sha256(presented);
        expected
            .iter()
            .zip(presented.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

fn sha256(value: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(value.as_bytes()));
    out
}

/// Gateway authentication middleware for the v2 endpoints; failures use the
/// numeric-code result envelope
pub async fn esb_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    authenticate(&state.esb, &headers, request.uri().path()).map_err(ApiError::unauthorized)?;
    Ok(next.run(request).await)
}

/// Gateway authentication middleware for the legacy v1 listing; failures use
/// the v1 envelope with a string code
pub async fn esb_auth_v1_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Response {
    match authenticate(&state.esb, &headers, request.uri().path()) {
        Ok(()) => next.run(request).await,
        Err(msg) => (StatusCode::UNAUTHORIZED, V1Response::fail(msg, "401")).into_response(),
    }
}

fn authenticate(esb: &EsbCredential, headers: &HeaderMap, path: &str) -> Result<(), &'static str> {
    if !esb.is_configured() {
        tracing::error!("ESB token not configured, rejecting {}", path);
        return Err("gateway credential not configured");
    }

    let token = extract_token(headers).map_err(|msg| {
        tracing::warn!("Gateway authentication failed for {}: {}", path, msg);
        msg
    })?;

    if !esb.verify(token) {
        tracing::warn!("Gateway authentication failed for {}: bad token", path);
        return Err("request is not from a trusted gateway");
    }
    Ok(())
}

/// Extract the gateway token from the request headers
fn extract_token(headers: &HeaderMap) -> Result<&str, &'static str> {
    let value = headers
        .get(ESB_TOKEN_HEADER)
        .ok_or("missing gateway credential")?;

    let token = value
        .to_str()
        .map_err(|_| "invalid gateway credential header")?
        .trim();

    if token.is_empty() {
        return Err("empty gateway credential");
    }
    Ok(token)
}
