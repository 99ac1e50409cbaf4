//! Go Five - Unified CLI
//!
//! Runs the room store server or a terminal player.

#![warn(missing_docs)]

use anyhow::Result;
use clap::Parser;
use go_five::cli::{Cli, Command};
use go_five::{ClientConfig, HttpRoomStore, MemoryRoomStore, RoomClient, RoomStore, console, server};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { port, host } => run_server(host, port).await,
        Command::Play {
            server_url,
            room,
            config,
            poll_ms,
        } => run_player(server_url, room, config, poll_ms).await,
    }
}

/// Run the room store server
async fn run_server(host: String, port: u16) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!(%host, port, "Starting Go Five room store");

    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    server::serve(listener, MemoryRoomStore::new()).await?;
    Ok(())
}

/// Run a terminal player
#[instrument]
async fn run_player(
    server_url: Option<String>,
    room: Option<String>,
    config: Option<PathBuf>,
    poll_ms: Option<u64>,
) -> Result<()> {
    // Logs go to stderr so the board on stdout stays readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match config {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::default(),
    }
    .with_env()
    .with_overrides(server_url, room.as_deref());
    if let Some(poll_ms) = poll_ms {
        config = config.with_poll_interval_ms(poll_ms);
    }

    let store: Arc<dyn RoomStore> = match config.base_url() {
        Some(base_url) => {
            info!(%base_url, room = %config.room(), "Joining shared room");
            Arc::new(HttpRoomStore::new(base_url.clone()))
        }
        None => {
            info!("No room store configured, playing locally");
            Arc::new(MemoryRoomStore::new())
        }
    };

    let handle = RoomClient::spawn(*config.room(), store, config.poll_interval());
    console::run(handle).await
}
