use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::Value;

/// Success code of the v1 envelope
pub const V1_SUCCESS_CODE: &str = "00";

/// Numeric codes carried by the v2 envelopes
pub mod codes {
    pub const SUCCESS: i64 = 0;
    pub const PARAM_NOT_VALID: i64 = 1302100;
}

/// Legacy v1 envelope: `{result, code, message, data}` with a string code
#[derive(Debug, Serialize)]
pub struct V1Response<T: Serialize> {
    pub result: bool,
    pub code: &'static str,
    pub message: String,
    pub data: T,
}

impl<T: Serialize> V1Response<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            result: true,
            code: V1_SUCCESS_CODE,
            message: message.into(),
            data,
        }
    }
}

impl V1Response<Option<Value>> {
    pub fn fail(message: impl Into<String>, code: &'static str) -> Self {
        Self {
            result: false,
            code,
            message: message.into(),
            data: None,
        }
    }
}

/// Gateway v2 listing envelope: `{bk_error_msg, bk_error_code, data}`
#[derive(Debug, Serialize)]
pub struct BkV2Response<T: Serialize> {
    pub bk_error_msg: String,
    pub bk_error_code: i64,
    pub data: T,
}

impl<T: Serialize> BkV2Response<T> {
    pub fn ok(data: T) -> Self {
        Self {
            bk_error_msg: String::new(),
            bk_error_code: codes::SUCCESS,
            data,
        }
    }
}

/// v2 result envelope used by the light app endpoints: `{result, code, message, data}`
/// with a numeric code. Failures carry `data: null`.
#[derive(Debug, Serialize)]
pub struct V2Response<T: Serialize> {
    pub result: bool,
    pub code: i64,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> V2Response<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            result: true,
            code: codes::SUCCESS,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl V2Response<Value> {
    pub fn fail(message: impl Into<String>, code: i64) -> Self {
        Self {
            result: false,
            code,
            message: message.into(),
            data: None,
        }
    }
}

/// Empty JSON object used as `data` by operations that return nothing
#[derive(Debug, Default, Serialize)]
pub struct Empty {}

fn serialize_or_500<T: Serialize>(body: &T) -> Response {
    match serde_json::to_value(body) {
        Ok(value) => (StatusCode::OK, Json(value)).into_response(),
        Err(e) => {
            tracing::error!("Failed to serialize response data: {}", e);
            let code = i64::from(StatusCode::INTERNAL_SERVER_ERROR.as_u16());
            let body = V2Response::<Value>::fail("Failed to serialize response data", code);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

impl<T: Serialize> IntoResponse for V1Response<T> {
    fn into_response(self) -> Response {
        serialize_or_500(&self)
    }
}

impl<T: Serialize> IntoResponse for BkV2Response<T> {
    fn into_response(self) -> Response {
        serialize_or_500(&self)
    }
}

impl<T: Serialize> IntoResponse for V2Response<T> {
    fn into_response(self) -> Response {
        serialize_or_500(&self)
    }
}
