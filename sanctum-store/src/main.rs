//! Sanctum Content Store Daemon
//!
//! Serves the content records behind the retreat-center site and its admin
//! editor over a small REST API.
//!
//! ## Usage
//!
//! ```bash
//! # Start with defaults
//! sanctum-store
//!
//! # Start with custom config
//! sanctum-store --config /path/to/config.toml
//!
//! # Start with custom HTTP port
//! sanctum-store --http-port 8086
//!
//! # Start with custom data directory
//! sanctum-store --data-dir /data/sanctum
//! ```
//!
//! ## HTTP API
//!
//! - `GET /health` - Health check
//! - `GET /stats` - Record counts
//! - `GET /content?section=<s>` - List records
//! - `POST /content` - Create a record
//! - `POST /content/bulk` - Seed records
//! - `PUT /content?id=<id>` - Update a record
//! - `PUT /content?action=reorder` - Reorder records
//! - `DELETE /content?id=<id>` - Delete a record

use clap::Parser;
use sanctum_store::{Config, ContentStore, HttpServer};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sanctum-store")]
#[command(about = "Content store daemon for the Sanctum retreat-center site")]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Data directory
    #[arg(long, env = "SANCTUM_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// HTTP API port
    #[arg(long, env = "SANCTUM_HTTP_PORT")]
    http_port: Option<u16>,

    /// Address to bind the HTTP server to
    #[arg(long, env = "SANCTUM_BIND_ADDR")]
    bind_addr: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("sanctum_store=info".parse()?),
        )
        .init();

    let args = Args::parse();

    // Load config
    let mut config = if let Some(config_path) = &args.config {
        Config::load(config_path)?
    } else {
        Config::default()
    };

    // Apply CLI overrides
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }
    if let Some(port) = args.http_port {
        config.http_port = port;
    }
    if let Some(addr) = args.bind_addr {
        config.bind_addr = addr;
    }

    info!(
        data_dir = %config.data_dir.display(),
        http_port = config.http_port,
        "Starting sanctum-store"
    );

    // Ensure data directory exists
    tokio::fs::create_dir_all(&config.data_dir).await?;

    // Save default config if it doesn't exist
    let config_path = config.config_path();
    if !config_path.exists() {
        config.save(&config_path)?;
        info!(path = %config_path.display(), "Created default config");
    }

    // Open the content database
    let store = Arc::new(ContentStore::open(config.db_path())?);

    // Start HTTP server
    let http_addr: SocketAddr = format!("{}:{}", config.bind_addr, config.http_port).parse()?;
    let http_server = Arc::new(HttpServer::new(store.clone(), http_addr));

    info!("HTTP API available at http://{}", http_addr);
    info!("Endpoints:");
    info!("  GET    /health                    - Health check");
    info!("  GET    /stats                     - Record counts");
    info!("  GET    /content?section=<s>       - List records");
    info!("  POST   /content                   - Create a record");
    info!("  POST   /content/bulk              - Seed records");
    info!("  PUT    /content?id=<id>           - Update a record");
    info!("  PUT    /content?action=reorder    - Reorder records");
    info!("  DELETE /content?id=<id>           - Delete a record");
    info!("Press Ctrl+C to stop.");

    // Handle shutdown signal
    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        info!("Shutting down...");
    };

    // Run HTTP server with graceful shutdown
    tokio::select! {
        result = http_server.run() => {
            if let Err(e) = result {
                error!(error = %e, "HTTP server error");
            }
        }
        _ = shutdown => {}
    }

    // Log final stats on the way out
    match store.stats() {
        Ok(stats) => info!(
            total = stats.total_records,
            active = stats.active_records,
            sections = stats.sections,
            "Final store stats"
        ),
        Err(e) => error!(error = %e, "Failed to read final stats"),
    }

    info!("sanctum-store stopped");
    Ok(())
}
