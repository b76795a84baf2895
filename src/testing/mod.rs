use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::{TimeZone, Utc};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::config::AppConfig;
use crate::database::models::App;
use crate::database::{Fixture, MemoryRepository};
use crate::middleware::{EsbCredential, ESB_TOKEN_HEADER};
use crate::state::AppState;
use crate::storage::LogoStorage;

pub const TEST_ESB_TOKEN: &str = "test-esb-token";

/// Router over an in-memory repository and a temporary media root, built from
/// the development preset so the process environment has no effect
pub struct TestContext {
    pub repository: Arc<MemoryRepository>,
    pub media: TempDir,
    router: Router,
}

/// Three apps, newest first: test1, test2, test3
pub fn sample_fixture() -> Fixture {
    let app = |code: &str, name: &str, day: u32, introduction: &str| App {
        code: code.to_string(),
        name: name.to_string(),
        introduction: introduction.to_string(),
        creator: "admin".to_string(),
        developer_str: "admin;dev1".to_string(),
        created_date: Utc.with_ymd_and_hms(2024, 3, day, 8, 0, 0).unwrap(),
    };

    Fixture {
        apps: vec![
            app("test2", "测试2", 2, "second app"),
            app("test3", "测试3", 1, "third app"),
            app("test1", "测试1", 3, "first app"),
        ],
        useful_links: vec![],
    }
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_fixture(sample_fixture())
    }

    pub fn with_fixture(fixture: Fixture) -> Self {
        let media = tempfile::tempdir().expect("failed to create media dir");
        let repository = Arc::new(MemoryRepository::from_fixture(fixture));
        let state = AppState::new(
            repository.clone(),
            LogoStorage::new(media.path(), 64 * 1024),
            EsbCredential::new(TEST_ESB_TOKEN),
        );
        let router = crate::app(state, &AppConfig::development());

        Self {
            repository,
            media,
            router,
        }
    }

    /// Authenticated request with an optional JSON body
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let body = match body {
            Some(json) => Body::from(json.to_string()),
            None => Body::empty(),
        };
        self.send_raw(method, uri, body, Some(TEST_ESB_TOKEN)).await
    }

    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        body: Body,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header(ESB_TOKEN_HEADER, token);
        }
        let request = builder.body(body).expect("failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response is not JSON")
        };
        (status, json)
    }

    /// Create a light app under `test1` and return its code
    pub async fn create_light_app(&self, name: &str, introduction: Option<&str>) -> String {
        let mut body = serde_json::json!({
            "bk_app_code": "test1",
            "bk_light_app_name": name,
            "app_url": "https://light.example.com/",
        });
        if let Some(introduction) = introduction {
            body["introduction"] = Value::from(introduction);
        }
        let (status, json) = self
            .send(Method::POST, "/paas/api/v2/light_app/create_app/", Some(body))
            .await;
        assert_eq!(status, StatusCode::OK, "create failed: {}", json);
        json["data"]["bk_light_app_code"]
            .as_str()
            .expect("missing bk_light_app_code")
            .to_string()
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
