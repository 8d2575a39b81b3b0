//! neurasync-server - Wellness dashboard backend
//!
//! Loads configuration, seeds the in-memory store with demo data, wires the
//! emotion detection chain and chat responder, and serves the REST API.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use neurasync_common::config::{load_config, ChatProviderKind};
use neurasync_common::store::MemoryStore;
use neurasync_server::chat::responder_from_config;
use neurasync_server::detection::DetectionChain;
use neurasync_server::{build_router, AppState};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for neurasync-server
#[derive(Parser, Debug)]
#[command(name = "neurasync-server")]
#[command(about = "Neurasync wellness dashboard backend")]
#[command(version)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, env = "NEURASYNC_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(short, long, env = "NEURASYNC_BIND")]
    bind: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "NEURASYNC_PORT")]
    port: Option<u16>,

    /// Log level for this service (RUST_LOG overrides)
    #[arg(long, env = "NEURASYNC_LOG_LEVEL")]
    log_level: Option<String>,

    /// Chat provider: openai, gemini or scripted
    #[arg(long, env = "NEURASYNC_CHAT_PROVIDER")]
    chat_provider: Option<ChatProviderKind>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config =
        load_config(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(bind) = args.bind {
        config.server.bind_addr = bind;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    if let Some(provider) = args.chat_provider {
        config.chat.provider = provider;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "neurasync_server={level},neurasync_common={level},tower_http={level}",
                    level = config.logging.level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Build identification first, before anything slow
    info!(
        "Starting Neurasync server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let store = MemoryStore::with_demo_data()
        .await
        .context("Failed to seed demo data")?;
    info!("In-memory store seeded with demo data");

    let detection = DetectionChain::from_config(&config.detection)
        .context("Failed to build emotion detection chain")?;
    let chat = responder_from_config(&config.chat).context("Failed to build chat responder")?;

    let state = AppState::new(Arc::new(store), detection, chat);
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.bind_addr, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid bind address {}:{}",
                config.server.bind_addr, config.server.port
            )
        })?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("neurasync-server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
