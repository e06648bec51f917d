use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::core::models::rates::CostRates;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_format")]
    pub default_format: String,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_format() -> String {
    "text".to_string()
}
fn default_color() -> String {
    "auto".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_format: default_format(),
            color: default_color(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSettings {
    /// Directory holding the per-month CSV files.
    #[serde(default = "default_ledger_dir")]
    pub dir: String,
    /// Fixed pause between consecutive usage requests.
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
}

fn default_ledger_dir() -> String {
    "api_usage".to_string()
}
fn default_request_delay_ms() -> u64 {
    1000
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            dir: default_ledger_dir(),
            request_delay_ms: default_request_delay_ms(),
        }
    }
}

/// Token prices in USD per million tokens, plus the exchange rate into the
/// currency the ledger is kept in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateSettings {
    #[serde(default = "default_input_usd")]
    pub input_usd_per_million: f64,
    #[serde(default = "default_output_usd")]
    pub output_usd_per_million: f64,
    #[serde(default = "default_exchange_rate")]
    pub exchange_rate: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_input_usd() -> f64 {
    10.0
}
fn default_output_usd() -> f64 {
    30.0
}
fn default_exchange_rate() -> f64 {
    33.0
}
fn default_currency() -> String {
    "TWD".to_string()
}

impl Default for RateSettings {
    fn default() -> Self {
        Self {
            input_usd_per_million: default_input_usd(),
            output_usd_per_million: default_output_usd(),
            exchange_rate: default_exchange_rate(),
            currency: default_currency(),
        }
    }
}

impl RateSettings {
    pub fn cost_rates(&self) -> CostRates {
        CostRates::from_usd_per_million(
            self.input_usd_per_million,
            self.output_usd_per_million,
            self.exchange_rate,
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub ledger: LedgerSettings,
    #[serde(default)]
    pub rates: RateSettings,
}

impl AppConfig {
    /// Get the config file path, respecting XDG_CONFIG_HOME
    pub fn config_path() -> PathBuf {
        let config_dir = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("~"))
                    .join(".config")
            });
        config_dir.join("uled").join("config.toml")
    }

    /// Load config from the default path, falling back to defaults if not found
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Serialize and write this config to the config file path.
    pub fn save(&self) -> Result<PathBuf, std::io::Error> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).expect("Failed to serialize config");
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Validate the config
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if !["text", "json"].contains(&self.settings.default_format.as_str()) {
            issues.push(format!(
                "Invalid default_format: '{}' (must be 'text' or 'json')",
                self.settings.default_format
            ));
        }
        if !["auto", "always", "never"].contains(&self.settings.color.as_str()) {
            issues.push(format!(
                "Invalid color: '{}' (must be 'auto', 'always', or 'never')",
                self.settings.color
            ));
        }
        if self.ledger.dir.is_empty() {
            issues.push("Ledger dir must not be empty".to_string());
        }
        if self.rates.input_usd_per_million < 0.0 {
            issues.push(format!(
                "Negative input_usd_per_million: {}",
                self.rates.input_usd_per_million
            ));
        }
        if self.rates.output_usd_per_million < 0.0 {
            issues.push(format!(
                "Negative output_usd_per_million: {}",
                self.rates.output_usd_per_million
            ));
        }
        if self.rates.exchange_rate <= 0.0 {
            issues.push(format!(
                "Exchange rate must be positive, got {}",
                self.rates.exchange_rate
            ));
        }
        if self.rates.currency.is_empty() {
            issues.push("Currency label must not be empty".to_string());
        }
        issues
    }
}
