//! Tradewire Server Entrypoint
//!
//! Reads a single JSON RPC request from stdin, dispatches it through the
//! interceptor chain, and writes a JSON response to stdout. Designed to
//! sit behind an external transport (forced command, inetd-style
//! supervisor) that owns connection handling.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use tradewire_server::{serve, ServerConfig};

#[derive(Parser)]
#[command(name = "tradewire-server")]
#[command(about = "Tradewire RPC server", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve one RPC call over stdin/stdout
    Serve {
        /// Path to a TOML config file (defaults apply when omitted)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => {
            let config = match config {
                Some(path) => match ServerConfig::load(&path) {
                    Ok(config) => config,
                    Err(e) => {
                        eprintln!("error: {}", e);
                        process::exit(1);
                    }
                },
                None => ServerConfig::default(),
            };
            process::exit(serve(&config));
        }
    }
}
