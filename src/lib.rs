pub mod api;
pub mod config;
pub mod database;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod storage;

#[cfg(test)]
pub mod testing;

use axum::{
    extract::DefaultBodyLimit,
    routing::{any, get},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::handlers::light_app::{OperationKind, LIGHT_APP_PREFIX};
use crate::middleware::{esb_auth_middleware, esb_auth_v1_middleware};
use crate::state::AppState;

/// Build the full router for the given state
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        // Gateway authenticated API
        .merge(api_routes(state.clone()))
        // Global middleware
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .layer(TraceLayer::new_for_http());

    if config.security.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }

    router.with_state(state)
}

fn api_routes(state: AppState) -> Router<AppState> {
    let v1 = Router::new()
        .route("/paas/api/app_info/", get(handlers::app_info))
        .route_layer(axum::middleware::from_fn_with_state(state.clone(), esb_auth_v1_middleware));

    let v2 = Router::new()
        .route("/paas/api/v2/app_info/", get(handlers::app_info_v2))
        .merge(light_app_routes())
        .route_layer(axum::middleware::from_fn_with_state(state, esb_auth_middleware));

    v1.merge(v2)
}

fn light_app_routes() -> Router<AppState> {
    OperationKind::ALL
        .into_iter()
        .fold(Router::new(), |router, kind| {
            router.route(&kind.route(), kind.method_router())
        })
        // Unknown operation segments
        .route(
            &format!("{}/:operation/", LIGHT_APP_PREFIX),
            any(handlers::method_not_allowed),
        )
}
