//! Ladle CLI: the main entry point.
//!
//! Commands:
//! - `run`: Find a recipe (or convert, or substitute) for a request
//! - `capabilities`: List what the agent can do
//! - `onboard`: Initialize config
//! - `status`: Show configuration status
//! - `doctor`: Diagnose setup problems

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "ladle",
    about = "Ladle: an LLM agent that finds recipes",
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
    /// Run a task, e.g. "find a vegetarian soup recipe with tomato, no eggs"
    Run {
        /// What you want, in plain English
        #[arg(required = true, num_args = 1..)]
        task: Vec<String>,

        /// Maximum selection→execution cycles
        #[arg(short, long, env = "LADLE_MAX_STEPS")]
        max_steps: Option<u32>,

        /// Pause between steps, in milliseconds
        #[arg(long)]
        cooldown_ms: Option<u64>,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the capabilities offered to the model
    Capabilities {
        /// Print the full schema as JSON
        #[arg(long)]
        json: bool,
    },

    /// Initialize configuration
    Onboard,

    /// Show configuration status
    Status,

    /// Diagnose setup problems
    Doctor,
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
        .init();

    match cli.command {
        Commands::Run {
            task,
            max_steps,
            cooldown_ms,
            json,
        } => {
            let options = commands::run::RunOptions {
                task: task.join(" "),
                max_steps,
                cooldown_ms,
                json,
            };
            commands::run::run(options).await?
        }
        Commands::Capabilities { json } => commands::capabilities::run(json).await?,
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Status => commands::status::run().await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
