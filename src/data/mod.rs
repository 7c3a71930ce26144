//! Market data sources
//!
//! A source supplies daily OHLCV history for a ticker. The Tushare client
//! talks to the real upstream; the simulated source produces a
//! deterministic synthetic walk for offline runs and tests.

pub mod simulated;
pub mod tushare;

pub use simulated::SimulatedSource;
pub use tushare::TushareClient;

use crate::config::{DataProvider, MarketDataConfig};
use crate::error::Result;
use crate::types::PriceSeries;
use async_trait::async_trait;

/// Supplies an ordered price series for a ticker.
///
/// Implementations fail with `SentinelError::Upstream` when the upstream
/// has no data; that is fatal for the analysis request. Retry policy, if
/// any, belongs to the implementation, not the pipeline.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn fetch_series(&self, ticker: &str) -> Result<PriceSeries>;

    /// Source name for logging
    fn name(&self) -> &'static str;
}

/// Construct the configured source
pub fn source_from_config(config: &MarketDataConfig) -> Result<Box<dyn MarketDataSource>> {
    Ok(match config.provider {
        DataProvider::Tushare => Box::new(TushareClient::new(config)?),
        DataProvider::Simulated => Box::new(SimulatedSource::new(config.lookback_days)),
    })
}
