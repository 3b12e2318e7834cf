//! Absence Engine HTTP server entry point.

use absence_engine::api::{create_router, AppState};
use absence_engine::config::ConfigLoader;
use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Serves absence listings and calendar overviews from a YAML snapshot.
#[derive(Parser, Debug)]
#[command(name = "absence-engine")]
#[command(version, about, long_about = None)]
struct Args {
    /// Snapshot directory
    #[arg(short, long, default_value = "./config/demo")]
    config: String,

    /// Address to bind to; defaults to the snapshot's bind_address
    #[arg(short, long)]
    bind: Option<String>,

    /// Log as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if args.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting Absence Engine v{}", env!("CARGO_PKG_VERSION"));

    let config = ConfigLoader::load(&args.config)
        .with_context(|| format!("failed to load snapshot from {}", args.config))?;
    let bind = args
        .bind
        .unwrap_or_else(|| config.settings().bind_address.clone());

    let router = create_router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {}", bind))?;

    tracing::info!(address = %bind, "Listening");
    axum::serve(listener, router).await?;

    Ok(())
}
