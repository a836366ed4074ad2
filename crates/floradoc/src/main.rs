//! FloraDoc CLI - diagnose plant diseases from photos.
//!
//! Each image is sent to a multimodal model that identifies the plant,
//! detects disease, and suggests organic and chemical treatments.
//!
//! # Usage
//!
//! ```bash
//! # Diagnose a photo
//! floradoc analyze leaf.jpg
//!
//! # Several photos, one JSON object per line
//! floradoc analyze a.jpg b.png --format jsonl --output results.jsonl
//!
//! # View configuration
//! floradoc config show
//!
//! # Check that the API key resolves
//! floradoc config check
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// FloraDoc - plant disease diagnosis from a single photo.
#[derive(Parser, Debug)]
#[command(name = "floradoc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Diagnose plant photos
    Analyze(cli::analyze::AnalyzeArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match floradoc_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `floradoc config path`."
            );
            floradoc_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("FloraDoc v{}", floradoc_core::VERSION);

    match cli.command {
        Commands::Analyze(args) => cli::analyze::execute(args, &config).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
