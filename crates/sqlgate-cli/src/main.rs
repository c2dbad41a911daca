mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sqlgate_core::GatewayConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sqlgate", version, about = "SQL Server command gateway for AI agents")]
struct Cli {
    /// Configuration file path.
    #[arg(
        short,
        long,
        global = true,
        default_value = "sqlgate.yaml",
        env = "SQLGATE_CONFIG"
    )]
    config: PathBuf,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Connect to SQL Server and serve the MCP tool catalog.
    Serve(commands::serve::ServeArgs),

    /// Inspect the operation catalog (list/describe).
    Tools {
        #[command(subcommand)]
        cmd: ToolsCommand,
    },

    /// Validate arguments and print the statement an operation would run.
    /// Does not connect to the database.
    Render(commands::render::RenderArgs),
}

#[derive(Subcommand, Debug)]
enum ToolsCommand {
    /// List every operation with its category and access mode.
    List {
        /// Also print each input schema.
        #[arg(long, default_value_t = false)]
        verbose: bool,
    },

    /// Show the input schema of one operation.
    Describe { name: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = GatewayConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load configuration from {:?}", cli.config))?;
    init_tracing(&config.logging.filter);
    if !cli.config.exists() {
        tracing::warn!(config = %cli.config.display(), "Config file not found, using defaults");
    }

    match cli.cmd {
        Command::Serve(args) => commands::serve::run(config, args).await?,
        Command::Tools { cmd } => match cmd {
            ToolsCommand::List { verbose } => commands::tools::list(&config, verbose)?,
            ToolsCommand::Describe { name } => commands::tools::describe(&config, &name)?,
        },
        Command::Render(args) => commands::render::run(&config, args)?,
    }

    Ok(())
}

/// Logs go to stderr; stdout belongs to the stdio transport.
fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
