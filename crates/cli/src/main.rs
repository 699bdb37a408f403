//! Kit Return CLI - Operator tools for the kit return webhook.
//!
//! # Usage
//!
//! ```bash
//! # Re-run a stored Shippo payload through the full pipeline
//! kr-cli replay payloads/delivered.json
//!
//! # Show which order/fulfillment a payload resolves to, without mutating
//! kr-cli resolve payloads/delivered.json
//! ```
//!
//! # Commands
//!
//! - `replay` - Filter, resolve and apply the Shopify mutations
//! - `resolve` - Filter and resolve only (lookups allowed, no mutations)
//!
//! Both commands read the same environment as the webhook server.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "kr-cli")]
#[command(author, version, about = "Kit return webhook tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a stored Shippo webhook payload against the configured store
    Replay {
        /// Path to the JSON payload
        file: PathBuf,
    },
    /// Resolve the order and fulfillment for a payload without mutating
    Resolve {
        /// Path to the JSON payload
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    // Install rustls crypto provider (must be done before any TLS operations)
    let _ = rustls::crypto::ring::default_provider().install_default();

    match cli.command {
        Commands::Replay { file } => {
            commands::replay::run(&file).await?;
        }
        Commands::Resolve { file } => {
            commands::resolve::run(&file).await?;
        }
    }
    Ok(())
}
