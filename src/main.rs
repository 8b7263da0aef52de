//! Calculator microservice.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server (request ID, trace span, request log)
//!                        │
//!                        ▼
//!                     validation (num1/num2 or num → finite f64)
//!                        │  400 on missing / invalid
//!                        ▼
//!                     calculator (domain checks → 400)
//!                        │
//!                        ├── protected op ──▶ resilience::circuit_breaker ── open → 503
//!                        │
//!                        ▼
//!     ◀────────────── http::response (JSON body + timestamp)
//!
//!     Panics anywhere below the router → http::recovery → 500 + reference
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use calculator_service::config::{load_config, ServiceConfig};
use calculator_service::health;
use calculator_service::http::HttpServer;
use calculator_service::lifecycle::{signals, Shutdown};
use calculator_service::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "calculator-service")]
#[command(about = "Arithmetic over HTTP with a circuit breaker", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    health::process_started_at();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability)?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        failure_threshold = config.circuit_breaker.failure_threshold,
        cooldown_ms = config.circuit_breaker.cooldown_ms,
        config_file = ?args.config,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(
        address = %local_addr,
        "Calculator microservice running on port {}",
        local_addr.port()
    );

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config);

    tokio::spawn(async move {
        signals::trigger_on_signal(&shutdown).await;
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
