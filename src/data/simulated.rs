//! Deterministic synthetic market data
//!
//! A geometric-ish random walk seeded from the ticker symbol, so the same
//! ticker always produces the same history. Lets the tool run end to end
//! with no network and no token, and gives tests a stable upstream.

use crate::error::Result;
use crate::types::{PriceBar, PriceSeries};
use async_trait::async_trait;
use chrono::{Days, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::MarketDataSource;

pub struct SimulatedSource {
    lookback_days: i64,
}

impl SimulatedSource {
    pub fn new(lookback_days: i64) -> Self {
        Self {
            lookback_days: lookback_days.max(1),
        }
    }
}

#[async_trait]
impl MarketDataSource for SimulatedSource {
    async fn fetch_series(&self, ticker: &str) -> Result<PriceSeries> {
        let mut rng = StdRng::seed_from_u64(ticker_seed(ticker));

        let n = self.lookback_days as usize;
        let start_date = Utc::now().date_naive() - Duration::days(self.lookback_days - 1);
        let mut close = rng.random_range(20.0..500.0);
        let drift = rng.random_range(-0.001..0.002);

        let mut bars = Vec::with_capacity(n);
        for i in 0..n {
            let open = close;
            let daily_return: f64 = drift + rng.random_range(-0.02..0.02);
            close = (open * (1.0 + daily_return)).max(1.0);

            let spread = open.max(close) * rng.random_range(0.001..0.01);
            bars.push(PriceBar {
                date: start_date + Days::new(i as u64),
                open,
                high: open.max(close) + spread,
                low: (open.min(close) - spread).max(0.5),
                close,
                volume: rng.random_range(100_000.0_f64..5_000_000.0).round(),
            });
        }

        PriceSeries::from_bars(bars)
    }

    fn name(&self) -> &'static str {
        "simulated"
    }
}

/// Stable seed per ticker symbol
fn ticker_seed(ticker: &str) -> u64 {
    ticker
        .to_uppercase()
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325u64, |hash, byte| {
            (hash ^ byte as u64).wrapping_mul(0x0000_0100_0000_01b3)
        })
}
