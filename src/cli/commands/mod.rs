//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod generate;
mod quotas;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Settings;

#[derive(Parser)]
#[command(name = "toolscout")]
#[command(about = "AI tool directory metadata generation service")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides TOOLSCOUT_CONFIG)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Address to bind to: PORT, HOST, or HOST:PORT (default: server.bind from config)
        bind: Option<String>,
    },

    /// Generate metadata for one tool and print it as JSON
    Generate {
        /// Tool name, e.g. "Notion"
        #[arg(required = true, num_args = 1..)]
        tool_name: Vec<String>,

        /// Use in-memory quota counters instead of the quota database
        #[arg(long)]
        no_quota_db: bool,
    },

    /// Show API quota usage
    Quotas,
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| settings.server.bind.clone());
            serve::cmd_serve(&settings, &bind).await
        }
        Commands::Generate {
            tool_name,
            no_quota_db,
        } => generate::cmd_generate(&settings, &tool_name.join(" "), no_quota_db).await,
        Commands::Quotas => quotas::cmd_quotas(&settings).await,
    }
}
