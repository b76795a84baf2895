use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::state::AppState;

pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "result": true,
        "data": {
            "name": "PaaS App API",
            "version": version,
            "endpoints": {
                "app_info": "GET /paas/api/app_info/ (gateway)",
                "app_info_v2": "GET /paas/api/v2/app_info/ (gateway)",
                "light_app": "POST create_app, PUT edit_app, PUT modify_app_logo, DELETE del_app under /paas/api/v2/light_app/ (gateway)",
                "health": "GET /health (public)",
            }
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.repository.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "result": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "result": false,
                    "message": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
