use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use paas_app_api::config::{AppConfig, StorageBackend};
use paas_app_api::state::AppState;

#[derive(Parser)]
#[command(name = "paas-app-api")]
#[command(about = "App info and light app API served behind the PaaS gateway")]
#[command(version)]
struct Args {
    #[arg(long, help = "Port to listen on (overrides PAAS_API_PORT / PORT)")]
    port: Option<u16>,

    #[arg(long, help = "Storage backend: postgres or memory")]
    backend: Option<StorageBackend>,

    #[arg(long, help = "JSON fixture seeding the memory backend")]
    fixture: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, ESB_TOKEN, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .init();

    let args = Args::parse();

    // Start from the env-driven singleton and apply command-line overrides
    let mut config: AppConfig = paas_app_api::config::config().clone();
    if let Some(port) = args.port {
        config.api.port = port;
    }
    if let Some(backend) = args.backend {
        config.database.backend = backend;
    }
    if let Some(fixture) = args.fixture {
        config.database.fixture_path = Some(fixture);
    }

    tracing::info!(
        "Starting PaaS App API in {:?} mode with {:?} storage",
        config.environment,
        config.database.backend
    );
    if config.security.esb_token.is_empty() {
        tracing::warn!("ESB_TOKEN is not set; every /paas/api request will be rejected");
    }

    let state = AppState::from_config(&config)
        .await
        .context("failed to initialize storage")?;
    let repository = state.repository.clone();
    let app = paas_app_api::app(state, &config);

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("PaaS App API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    repository.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
