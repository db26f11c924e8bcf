use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::Path;

use crate::params::{DashboardParams, Frequency, Ticker};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub market_data: MarketDataConfig,
    pub defaults: DefaultsConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarketDataConfig {
    pub base_url: String,
    pub user_agent: String,
    #[serde(default = "default_auto_adjust")]
    pub auto_adjust: bool,
}

/// Initial selector values shown on startup.
#[derive(Debug, Clone, Deserialize)]
pub struct DefaultsConfig {
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub frequency: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    pub refresh_rate_ms: u64,
    #[serde(default = "default_table_rows")]
    pub table_rows: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

fn default_auto_adjust() -> bool {
    true
}

fn default_table_rows() -> usize {
    10
}

impl DefaultsConfig {
    pub fn to_params(&self) -> Result<DashboardParams> {
        let symbol: Ticker = self
            .symbol
            .parse()
            .with_context(|| format!("defaults.symbol '{}' is not offered", self.symbol))?;
        let frequency: Frequency = self
            .frequency
            .parse()
            .with_context(|| format!("defaults.frequency '{}' is not offered", self.frequency))?;
        Ok(DashboardParams {
            symbol,
            start_date: self.start_date,
            end_date: self.end_date,
            frequency,
        })
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::load_from(Path::new(DEFAULT_CONFIG_PATH))?;
        if let Ok(url) = std::env::var("MARKET_DATA_BASE_URL") {
            if !url.trim().is_empty() {
                config.market_data.base_url = url.trim().to_string();
            }
        }
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&config_str)
            .with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).context("invalid TOML")?;
        config
            .defaults
            .to_params()
            .context("[defaults] is invalid")?;
        Ok(config)
    }
}
