pub mod cli;
pub mod core;
pub mod providers;

use crate::core::cache::Cache;
use crate::core::config::AppConfig;
use crate::providers::alpha_vantage::{AlphaVantageQuoteProvider, AlphaVantageRateProvider};
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Commands that run against a loaded configuration.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Value the portfolio and write the enriched file. Paths override the
    /// configured ones.
    Calculate {
        input: Option<PathBuf>,
        output: Option<PathBuf>,
    },
    /// Summarize an enriched file.
    Summary {
        input: Option<PathBuf>,
        hide_dollar: bool,
    },
    /// Show income and expense flows.
    Budget {
        input: Option<PathBuf>,
        hide_dollar: bool,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("finboard starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!(
        input = %config.input_path.display(),
        output = %config.output_path.display(),
        long_term_hold_years = config.long_term_hold_years,
        "Loaded config"
    );

    match command {
        AppCommand::Calculate { input, output } => {
            let input = input.unwrap_or_else(|| config.input_path.clone());
            let output = output.unwrap_or_else(|| config.output_path.clone());

            let av_config = &config.providers.alpha_vantage;
            let api_key = config.alpha_vantage_api_key();
            if api_key.is_none() {
                warn!("No Alpha Vantage API key configured, quoted holdings will be valued at 0");
            }
            let quote_provider =
                AlphaVantageQuoteProvider::new(av_config, api_key.clone(), Arc::new(Cache::new()));
            let rate_provider =
                AlphaVantageRateProvider::new(av_config, api_key, Arc::new(Cache::new()));

            let today = chrono::Local::now().date_naive();
            cli::calculate::run(
                &input,
                &output,
                &quote_provider,
                &rate_provider,
                config.pipeline(),
                today,
            )
            .await
            .map(|_| ())
        }
        AppCommand::Summary { input, hide_dollar } => {
            let input = input.unwrap_or_else(|| config.output_path.clone());
            cli::summary::run(&input, config.show_dollar && !hide_dollar)
        }
        AppCommand::Budget { input, hide_dollar } => {
            let input = input.unwrap_or_else(|| config.budget_path.clone());
            cli::budget::run(&input, config.show_dollar && !hide_dollar)
        }
    }
}
