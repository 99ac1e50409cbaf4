//! Command-line interface for go_five.

use clap::{Parser, Subcommand};

/// Go Five - two-player five-in-a-row with shared rooms
#[derive(Parser, Debug)]
#[command(name = "go_five")]
#[command(about = "Five-in-a-row for two players, locally or across machines", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the room store server
    Serve {
        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Play in the terminal
    Play {
        /// Room store URL. If not provided, the game stays on this machine.
        #[arg(long)]
        server_url: Option<String>,

        /// Room to join, as a number or a query string like `?room=42`
        #[arg(short, long)]
        room: Option<String>,

        /// Path to a TOML client config
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Milliseconds between polls of the room document
        #[arg(long)]
        poll_ms: Option<u64>,
    },
}
