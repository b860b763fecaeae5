use anyhow::{Context, Result};
use clap::Parser;
use smartdoc::{api, config, logging, processing::AnalyzerService};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(name = "smartdoc", version, about = "AI-powered document analysis API")]
struct Cli {
    /// Interface to bind (overrides `SERVER_HOST`).
    #[arg(long)]
    host: Option<IpAddr>,
    /// Port to bind (overrides `SERVER_PORT`).
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing();

    let mut config = config::load_config().context("Failed to load config from environment")?;
    if let Some(host) = cli.host {
        config.server_host = host;
    }
    if let Some(port) = cli.port {
        config.server_port = port;
    }
    let config = Arc::new(config);

    let service = AnalyzerService::new(config.clone()).context("Failed to build analyzer")?;
    let app = api::create_router(Arc::new(service), config.max_upload_bytes);

    let address = SocketAddr::new(config.server_host, config.server_port);
    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    tracing::info!("Listening on http://{}", address);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %error, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
