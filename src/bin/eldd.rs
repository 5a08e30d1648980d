//! eldd: Eldhrimnir daemon.
//!
//! Serves the [`RecipeAgent`](eldhrimnir::RecipeAgent) over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use eldhrimnir::server::config::{Config, Secrets};
use eldhrimnir::{Eldhrimnir, EldhrimnirError};

/// Eldhrimnir daemon: dual-source recipe answering service.
#[derive(Parser)]
#[command(name = "eldd")]
#[command(version = eldhrimnir::PKG_VERSION)]
#[command(about = "Eldhrimnir recipe answering daemon")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long, env = "ELDHRIMNIR_CONFIG")]
    config: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = Config::load(args.config.as_deref())?;
    let secrets = Secrets::load()?;

    let agent = config.configure(&secrets, Eldhrimnir::builder()).build()?;
    let _sweepers = config
        .sweep_interval()
        .map(|period| agent.caches().spawn_sweepers(period));

    let addr: SocketAddr = config
        .server
        .address
        .parse()
        .map_err(|e| EldhrimnirError::Configuration(format!("Invalid address: {e}")))?;

    info!(
        version = eldhrimnir::version_string(),
        %addr,
        chat = secrets.api_key("chat").is_some(),
        recipes = secrets.api_key("recipes").is_some(),
        "eldd starting"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, eldhrimnir::server::router(Arc::new(agent)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("eldd stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
