use alerthub_ingest::engine::CorrelationEngine;
use alerthub_server::app;
use alerthub_server::config::ServerConfig;
use alerthub_server::state::AppState;
use alerthub_storage::HubStore;
use alerthub_ticketing::snow::SnowBackend;
use alerthub_ticketing::stub::StubBackend;
use alerthub_ticketing::TicketingBackend;
use anyhow::Result;
use chrono::Utc;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("alerthub=info".parse()?))
        .init();

    let args: Vec<String> = std::env::args().collect();
    let config_path = args
        .get(1)
        .map(|s| s.as_str())
        .unwrap_or("config/server.toml");
    let config = if Path::new(config_path).exists() {
        ServerConfig::load(config_path)?
    } else {
        tracing::warn!(
            path = config_path,
            "Config file not found; using defaults with the stub ticketing backend"
        );
        ServerConfig::default()
    };

    tracing::info!(
        http_port = config.http_port,
        data_dir = %config.data_dir,
        backend = %config.ticketing.backend,
        "alerthub-server starting"
    );

    let store = Arc::new(HubStore::new(Path::new(&config.data_dir))?);

    // The backend is chosen exactly once, here. Request handling only ever
    // sees the injected trait object.
    let ticketing: Arc<dyn TicketingBackend> =
        if config.ticketing.backend.eq_ignore_ascii_case("snow") {
            Arc::new(SnowBackend::new(config.ticketing.snow.clone()))
        } else {
            Arc::new(StubBackend::new())
        };

    let engine = Arc::new(CorrelationEngine::new(store.clone(), ticketing.clone()));
    let state = AppState {
        engine,
        store,
        ticketing,
        start_time: Utc::now(),
    };

    let addr: SocketAddr = format!("0.0.0.0:{}", config.http_port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(http = %addr, "Server started");

    axum::serve(listener, app::build_http_app(state))
        .with_graceful_shutdown(async {
            signal::ctrl_c().await.ok();
        })
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
