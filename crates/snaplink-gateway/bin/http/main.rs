mod cli;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use snaplink_codec::Codec;
use snaplink_core::LinkStore;
use snaplink_gateway::{App, AppState};
use snaplink_redirector::RedirectorService;
use snaplink_shortener::ShortenerService;
use snaplink_storage::{InMemoryLinkStore, MySqlLinkStore};
use snaplink_telemetry::TelemetryConfig;
use tracing::info;

use crate::cli::{StorageBackendArg, CLI};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();

    let _telemetry = snaplink_telemetry::init(
        &TelemetryConfig::builder()
            .service_name("snaplink-gateway")
            .log_format(config.log_format.into())
            .otlp_endpoint_opt(config.otlp_endpoint.clone())
            .build(),
    )?;

    info!(
        listen_addr = %config.listen_addr,
        public_base_url = %config.public_base_url,
        storage_backend = %config.storage,
        keyed_alphabet = config.secret_key.is_some(),
        "starting gateway server"
    );

    let codec = Codec::with_secret_key(config.secret_key.as_deref());

    match config.storage {
        StorageBackendArg::InMemory => {
            run_server(
                config.listen_addr,
                config.public_base_url,
                InMemoryLinkStore::new(),
                codec,
            )
            .await?;
        }
        StorageBackendArg::Mysql => {
            let mysql_dsn = config
                .mysql_dsn
                .context("mysql dsn is required when storage backend is mysql")?;
            let store = MySqlLinkStore::connect(&mysql_dsn)
                .await
                .context("failed to connect to mysql")?;
            store
                .ensure_schema()
                .await
                .context("failed to create short_links table")?;
            run_server(config.listen_addr, config.public_base_url, store, codec).await?;
        }
    }

    Ok(())
}

async fn run_server<S: LinkStore>(
    listen_addr: SocketAddr,
    public_base_url: String,
    store: S,
    codec: Codec,
) -> anyhow::Result<()> {
    let store = Arc::new(store);
    let shortener = ShortenerService::new(Arc::clone(&store), codec);
    let redirector = RedirectorService::new(store);
    let state = AppState::new(Arc::new(shortener), Arc::new(redirector), public_base_url);

    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("failed to bind {listen_addr}"))?;
    info!(listen_addr = %listener.local_addr()?, "gateway listening");

    axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    info!("shutting down gateway server");
}
