//! AgentKata CLI: the main entry point.
//!
//! Commands:
//! - `list`     : Show every kata and whether it is built
//! - `run`      : Run one kata
//! - `classify` : Classify a single message
//! - `route`    : Classify and route a single message
//! - `config`   : Show, locate, initialize or validate configuration

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "agentkata",
    about = "AgentKata: exercises in agentic AI design patterns",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this config file instead of ~/.agentkata/config.toml
    #[arg(long, global = true, env = "AGENTKATA_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all katas
    List,

    /// Run a kata by id (e.g. 00, 3)
    Run {
        id: String,

        /// Override router dispatch for the routing kata (mock or live)
        #[arg(short, long)]
        dispatch: Option<String>,
    },

    /// Classify a message against the built-in capabilities
    Classify {
        message: String,

        /// Sender phone number
        #[arg(short, long)]
        sender: Option<String>,

        /// Print the classification as JSON
        #[arg(long)]
        json: bool,
    },

    /// Classify a message and dispatch it to a handler
    Route {
        message: String,

        /// Sender phone number
        #[arg(short, long)]
        sender: Option<String>,

        /// mock or live (defaults to router.dispatch from config)
        #[arg(short, long)]
        dispatch: Option<String>,

        /// Print the routed result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration (secrets omitted)
    Show,
    /// Print the config file path
    Path,
    /// Write a default config file if none exists
    Init,
    /// Load and validate the config file
    Validate,
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

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::List => commands::list::run(config_path).await?,
        Commands::Run { id, dispatch } => commands::run::run(config_path, &id, dispatch).await?,
        Commands::Classify {
            message,
            sender,
            json,
        } => commands::classify::run(config_path, &message, sender, json).await?,
        Commands::Route {
            message,
            sender,
            dispatch,
            json,
        } => commands::route::run(config_path, &message, sender, dispatch, json).await?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show(config_path).await?,
            ConfigAction::Path => commands::config_cmd::path(config_path).await?,
            ConfigAction::Init => commands::config_cmd::init(config_path).await?,
            ConfigAction::Validate => commands::config_cmd::validate(config_path).await?,
        },
    }

    Ok(())
}
