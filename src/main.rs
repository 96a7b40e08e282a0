use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use finboard::core::log::init_logging;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for finboard::AppCommand {
    fn from(cmd: Commands) -> finboard::AppCommand {
        match cmd {
            Commands::Calculate { input, output } => {
                finboard::AppCommand::Calculate { input, output }
            }
            Commands::Summary { input, hide_dollar } => {
                finboard::AppCommand::Summary { input, hide_dollar }
            }
            Commands::Budget { input, hide_dollar } => {
                finboard::AppCommand::Budget { input, hide_dollar }
            }
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Fetch prices and write the enriched portfolio CSV
    Calculate {
        /// Portfolio CSV to read
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Enriched CSV to write
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Display allocation and gain/loss of an enriched portfolio
    Summary {
        /// Enriched CSV to read
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Show percentages only
        #[arg(long)]
        hide_dollar: bool,
    },
    /// Display income, expenses and savings from a budget CSV
    Budget {
        /// Budget CSV with Category, Source and Amount columns
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Show shares instead of amounts
        #[arg(long)]
        hide_dollar: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => finboard::cli::setup::setup(),
        Some(cmd) => finboard::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
