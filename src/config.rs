//! Configuration management
//!
//! Settings come from an optional TOML file layered with `SENTINEL_*`
//! environment variables (e.g. `SENTINEL_MARKET_DATA__TOKEN`). Every field
//! has a default so the tool runs out of the box against the simulated
//! data source.

use crate::error::Result;
use serde::Deserialize;
use std::path::Path;

/// Main configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub market_data: MarketDataConfig,
    #[serde(default)]
    pub news: NewsConfig,
    #[serde(default)]
    pub predictor: PredictorConfig,
}

impl Config {
    /// Load configuration from a TOML file plus environment overrides.
    /// A missing file is not an error; defaults apply.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(Path::new(path)).required(false))
            .add_source(config::Environment::with_prefix("SENTINEL").separator("__"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}

/// Database settings
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: default_db_path() }
    }
}

fn default_db_path() -> String {
    "data/sentinel.db".to_string()
}

/// Which market data upstream to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataProvider {
    /// Tushare daily-bars API (requires a token)
    Tushare,
    /// Deterministic synthetic data, no network
    Simulated,
}

/// Market data settings
#[derive(Debug, Clone, Deserialize)]
pub struct MarketDataConfig {
    #[serde(default = "default_provider")]
    pub provider: DataProvider,
    #[serde(default = "default_tushare_url")]
    pub base_url: String,
    /// API token for the Tushare provider
    #[serde(default)]
    pub token: String,
    /// How far back to request history, in days
    #[serde(default = "default_lookback_days")]
    pub lookback_days: i64,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            base_url: default_tushare_url(),
            token: String::new(),
            lookback_days: default_lookback_days(),
        }
    }
}

fn default_provider() -> DataProvider {
    DataProvider::Simulated
}

fn default_tushare_url() -> String {
    "http://api.tushare.pro".to_string()
}

fn default_lookback_days() -> i64 {
    365
}

/// News feed settings
#[derive(Debug, Clone, Deserialize)]
pub struct NewsConfig {
    /// JSON endpoint returning recent headlines for a ticker.
    /// When unset or unreachable, canned headlines are used.
    #[serde(default)]
    pub feed_url: Option<String>,
    #[serde(default = "default_max_headlines")]
    pub max_headlines: usize,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            feed_url: None,
            max_headlines: default_max_headlines(),
        }
    }
}

fn default_max_headlines() -> usize {
    8
}

/// Prediction pipeline settings
#[derive(Debug, Clone, Deserialize)]
pub struct PredictorConfig {
    /// Seed for the train/test shuffle split and the forest
    #[serde(default = "default_split_seed")]
    pub split_seed: u64,
    /// Trees in the random forest candidate
    #[serde(default = "default_forest_trees")]
    pub forest_trees: u16,
    /// Seed for the fallback noise multiplier; OS entropy when unset
    #[serde(default)]
    pub noise_seed: Option<u64>,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            split_seed: default_split_seed(),
            forest_trees: default_forest_trees(),
            noise_seed: None,
        }
    }
}

fn default_split_seed() -> u64 {
    42
}

fn default_forest_trees() -> u16 {
    100
}
