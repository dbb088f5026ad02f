//! TTS proxy binary.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client                         TTS PROXY                          Provider
//!       │  POST /cognitiveservices/v1  ┌───────────────────────┐
//!       ├─────────────────────────────▶│ request (limit, raw)  │
//!       │                              │          │            │  + Ocp-Apim-Subscription-Key
//!       │                              │          ▼            │  + Content-Type: ssml
//!       │                              │ upstream client ──────┼──────────────────────▶
//!       │                              │          │            │
//!       │  status, type/length, audio  │          ▼            │
//!       │◀─────────────────────────────┤ response relay ◀──────┼───────────────────────
//!                                      └───────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use tts_proxy::config::load_config;
use tts_proxy::lifecycle::{shutdown_on_signal, Shutdown};
use tts_proxy::observability::{logging, metrics};
use tts_proxy::HttpServer;

#[derive(Parser)]
#[command(name = "tts-proxy")]
#[command(about = "Forwards SSML synthesis requests to Azure Speech with a server-side key", long_about = None)]
struct Cli {
    /// Optional TOML config file; environment variables override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listening port (overrides PORT and the config file).
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let (mut config, upstream) = match load_config(cli.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            eprintln!("Please set AZURE_ENDPOINT and AZURE_KEY environment variables.");
            std::process::exit(1);
        }
    };
    if let Some(port) = cli.port {
        config.listener.port = port;
    }

    logging::init_logging(&config.observability);

    tracing::info!("tts-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        upstream = %upstream.synthesis_url,
        max_body_bytes = config.limits.max_body_bytes,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let bind_address = config.listener.bind_address();
    let server = match HttpServer::new(config, &upstream) {
        Ok(server) => server,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "TTS proxy listening"
    );

    let shutdown = std::sync::Arc::new(Shutdown::new());
    let server_shutdown = shutdown.subscribe();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        shutdown_on_signal(&signal_shutdown).await;
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
