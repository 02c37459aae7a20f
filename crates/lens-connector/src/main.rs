use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use lens_connector::config::ConnectorConfig;
use lens_connector::web::{router, AppState};

/// Timeline and live-log sidecar for the agent orchestration dashboard.
#[derive(Parser, Debug)]
#[command(name = "lens-connector", version, about)]
struct Args {
    /// Path to a TOML config file (defaults to the platform config dir).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the configured bind address.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = ConnectorConfig::load(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }

    let addr: SocketAddr = config
        .bind_addr
        .parse()
        .with_context(|| format!("invalid bind address '{}'", config.bind_addr))?;
    let app = AppState::new(&config);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "lens-connector listening");
    axum::serve(listener, router(app)).await?;

    Ok(())
}
