//! EduTrack REST API server.
//!
//! Builds the store and router from command-line configuration and serves
//! until Ctrl+C.

use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use edutrack_api::{AppState, Router, Server};
use edutrack_core::{config::DbConfig, Store};
use tokio::signal;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for the EduTrack server.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Request body read timeout in milliseconds
    #[arg(long, default_value_t = 5000)]
    request_timeout_ms: u64,

    /// Start with an empty store instead of the example data
    #[arg(long)]
    no_seed: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Installs the tracing subscriber. `RUST_LOG` wins over `--log-level`.
fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let config = DbConfig {
        seed_example_data: !args.no_seed,
        request_timeout_ms: args.request_timeout_ms,
        ..Default::default()
    };
    let store = Store::from_config(&config);
    tracing::info!(
        users = store.users().record_count(),
        courses = store.courses().record_count(),
        enrollments = store.enrollments().record_count(),
        "Store initialized"
    );

    let router = Router::new(AppState::new(store, config)).context("Failed to register routes")?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", args.host, args.port))?;
    let server = Server::new(addr, router);

    tracing::info!(
        host = %args.host,
        port = args.port,
        request_timeout_ms = args.request_timeout_ms,
        seeded = !args.no_seed,
        "Starting EduTrack server"
    );

    let server_handle = tokio::spawn(async move {
        if let Err(e) = server.serve().await {
            tracing::error!("Server error: {}", e);
        }
    });

    signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl_c")?;
    tracing::info!("Shutting down server");
    server_handle.abort();

    Ok(())
}
