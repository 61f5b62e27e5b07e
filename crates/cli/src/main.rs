//! Love-OS CLI — the main entry point.
//!
//! Commands:
//! - `chat`     — Interactive dialogue or single-message mode
//! - `inspect`  — Run the pipeline offline and show its measurements
//! - `doctor`   — Diagnose configuration and provider health
//! - `onboard`  — Write the default config file

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "loveos",
    about = "Love-OS — flow-optimized LLM dialogue",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Talk to the configured model through the flow engine
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Classify, retrieve and score a message without calling a model
    Inspect {
        /// The message to analyse
        text: String,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose configuration and provider health
    Doctor,

    /// Initialize the configuration directory
    Onboard,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Chat { message } => commands::chat::run(message).await?,
        Commands::Inspect { text, json } => commands::inspect::run(&text, json).await?,
        Commands::Doctor => commands::doctor::run().await?,
        Commands::Onboard => commands::onboard::run().await?,
    }

    Ok(())
}
