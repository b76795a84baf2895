use std::io::Write;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::json;
use tempfile::{NamedTempFile, TempDir};

pub const ESB_TOKEN: &str = "integration-esb-token";

/// Server process owned by one test; killed when dropped
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
    _fixture: NamedTempFile,
    _media: TempDir,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut fixture = NamedTempFile::new().context("failed to create fixture file")?;
        fixture.write_all(fixture_json().to_string().as_bytes())?;
        let media = tempfile::tempdir().context("failed to create media dir")?;

        // The binary is built by cargo for integration tests
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_paas-app-api"));
        cmd.env("PAAS_API_PORT", port.to_string())
            .env("STORAGE_BACKEND", "memory")
            .env("STORAGE_FIXTURE_PATH", fixture.path())
            .env("MEDIA_ROOT", media.path())
            .env("ESB_TOKEN", ESB_TOKEN)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self {
            port,
            base_url,
            child,
            _fixture: fixture,
            _media: media,
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn fixture_json() -> serde_json::Value {
    json!({
        "apps": [
            {
                "code": "test2",
                "name": "测试2",
                "introduction": "second app",
                "creator": "admin",
                "developer_str": "admin",
                "created_date": "2024-03-02T08:00:00Z"
            },
            {
                "code": "test1",
                "name": "测试1",
                "introduction": "first app",
                "creator": "admin",
                "developer_str": "admin;dev1",
                "created_date": "2024-03-03T08:00:00Z"
            }
        ]
    })
}

/// Spawn a fresh server for the calling test and wait until it is healthy
pub async fn start_server() -> Result<TestServer> {
    let server = TestServer::spawn()?;
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Client that sends the gateway credential on every request
pub fn gateway_client() -> Result<reqwest::Client> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert("x-esb-token", reqwest::header::HeaderValue::from_static(ESB_TOKEN));
    Ok(reqwest::Client::builder().default_headers(headers).build()?)
}
