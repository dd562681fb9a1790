//! rhymes CLI
//!
//! Command-line front end for rhyme lookups, either through the daemon or
//! against a local dataset file.

mod clipboard;
mod commands;

use clap::{Parser, Subcommand};
use clipboard::SystemClipboard;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// rhymes - find rhymes for a word
#[derive(Parser, Debug)]
#[command(name = "rhymes")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Daemon API address
    #[arg(long, default_value = "http://localhost:8787", global = true)]
    api: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Find rhymes through the daemon
    Find {
        /// Word to look up
        word: String,

        /// Copy the rhymes to the clipboard
        #[arg(long)]
        copy: bool,
    },

    /// Find rhymes in a local dataset file
    Lookup {
        /// Word to look up
        word: String,

        /// Path to a rhymes.json document
        #[arg(long, default_value = "rhymes.json")]
        dataset: PathBuf,

        /// Copy the rhymes to the clipboard
        #[arg(long)]
        copy: bool,
    },

    /// Reload the daemon's dataset
    Reload,

    /// Show daemon status
    Status,

    /// List cache stores
    Caches,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let client = commands::ApiClient::new(&cli.api);
    let clipboard = SystemClipboard::new();

    match cli.command {
        Commands::Find { word, copy } => {
            commands::find(&client, word, copy, &clipboard).await?;
        }
        Commands::Lookup {
            word,
            dataset,
            copy,
        } => {
            commands::lookup(&dataset, word, copy, &clipboard).await?;
        }
        Commands::Reload => {
            commands::reload(&client).await?;
        }
        Commands::Status => {
            commands::status(&client).await?;
        }
        Commands::Caches => {
            commands::caches(&client).await?;
        }
    }

    Ok(())
}
