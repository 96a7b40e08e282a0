use crate::core::hold_period::DEFAULT_LONG_TERM_HOLD_YEARS;
use crate::core::pipeline::PipelineConfig;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const API_KEY_ENV: &str = "ALPHA_VANTAGE_API_KEY";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AlphaVantageConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Extra attempts after a failed request send.
    #[serde(default = "default_retries")]
    pub retries: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AlphaVantageConfig {
    fn default() -> Self {
        AlphaVantageConfig {
            base_url: "https://www.alphavantage.co".to_string(),
            api_key: None,
            retries: default_retries(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_retries() -> usize {
    2
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub alpha_vantage: AlphaVantageConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// Income and expenses CSV read by `finboard budget`.
    pub budget_path: PathBuf,
    pub long_term_hold_years: f64,
    pub show_dollar: bool,
    pub providers: ProvidersConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            input_path: PathBuf::from("input/portfolio.csv"),
            output_path: PathBuf::from("input/temp_portfolio.csv"),
            budget_path: PathBuf::from("input/income_expenses.csv"),
            long_term_hold_years: DEFAULT_LONG_TERM_HOLD_YEARS,
            show_dollar: true,
            providers: ProvidersConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads the config at the default location, falling back to built-in
    /// defaults when no file has been set up.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "finboard", "finboard")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            long_term_hold_years: self.long_term_hold_years,
        }
    }

    /// The configured API key, else the `ALPHA_VANTAGE_API_KEY` variable.
    pub fn alpha_vantage_api_key(&self) -> Option<String> {
        resolve_api_key(
            self.providers.alpha_vantage.api_key.as_deref(),
            std::env::var(API_KEY_ENV).ok(),
        )
    }
}

fn resolve_api_key(configured: Option<&str>, from_env: Option<String>) -> Option<String> {
    configured
        .map(str::to_string)
        .or(from_env)
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
input_path: "data/holdings.csv"
output_path: "data/enriched.csv"
budget_path: "data/flows.csv"
long_term_hold_years: 1
show_dollar: false
providers:
  alpha_vantage:
    base_url: "http://example.com/av"
    api_key: "SECRET"
    retries: 0
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.input_path, PathBuf::from("data/holdings.csv"));
        assert_eq!(config.output_path, PathBuf::from("data/enriched.csv"));
        assert_eq!(config.budget_path, PathBuf::from("data/flows.csv"));
        assert_eq!(config.long_term_hold_years, 1.0);
        assert!(!config.show_dollar);
        assert_eq!(config.pipeline().long_term_hold_years, 1.0);

        let av = &config.providers.alpha_vantage;
        assert_eq!(av.base_url, "http://example.com/av");
        assert_eq!(av.api_key.as_deref(), Some("SECRET"));
        assert_eq!(av.retries, 0);
        assert_eq!(av.timeout_secs, 30);
        assert_eq!(config.alpha_vantage_api_key().as_deref(), Some("SECRET"));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: AppConfig = serde_yaml::from_str("show_dollar: true\n").unwrap();
        assert_eq!(config.input_path, PathBuf::from("input/portfolio.csv"));
        assert_eq!(config.output_path, PathBuf::from("input/temp_portfolio.csv"));
        assert_eq!(config.budget_path, PathBuf::from("input/income_expenses.csv"));
        assert_eq!(config.long_term_hold_years, 2.0);
        assert_eq!(
            config.providers.alpha_vantage.base_url,
            "https://www.alphavantage.co"
        );
        assert_eq!(config.providers.alpha_vantage.retries, 2);
        assert!(config.providers.alpha_vantage.api_key.is_none());
    }

    #[test]
    fn test_api_key_resolution() {
        assert_eq!(
            resolve_api_key(Some("CFG"), Some("ENV".to_string())).as_deref(),
            Some("CFG")
        );
        assert_eq!(
            resolve_api_key(None, Some("ENV".to_string())).as_deref(),
            Some("ENV")
        );
        assert_eq!(resolve_api_key(Some("  "), None), None);
        assert_eq!(resolve_api_key(None, None), None);
    }

    #[test]
    fn test_load_from_path_reports_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "long_term_hold_years: [not, a, number]").unwrap();
        let err = AppConfig::load_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
