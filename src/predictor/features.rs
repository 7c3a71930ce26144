//! Feature construction from price history
//!
//! Turns a price series into one fixed-width feature row per bar. All
//! windows clamp to the data that exists, so short series never error;
//! whether a series is long enough to train on is the selector's call.

use crate::types::PriceSeries;

/// Feature names in column order, for diagnostics output
pub const FEATURE_NAMES: [&str; 4] = [
    "moving_avg_5",
    "previous_close",
    "volume_ma_5",
    "volatility_5",
];

/// One feature row, tied to exactly one bar of the input series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    /// Mean close over the trailing window of up to 5 bars
    pub moving_avg_5: f64,
    /// Close of the prior bar; the first bar uses its own close
    pub previous_close: f64,
    /// Mean volume over the same trailing window
    pub volume_ma_5: f64,
    /// Sample standard deviation of percentage returns in the window
    pub volatility_5: f64,
}

impl FeatureVector {
    pub fn to_array(&self) -> [f64; 4] {
        [
            self.moving_avg_5,
            self.previous_close,
            self.volume_ma_5,
            self.volatility_5,
        ]
    }
}

/// Builds feature rows from a price series
pub struct FeatureBuilder;

impl FeatureBuilder {
    /// One output row per input bar, same order. The first row has no
    /// genuine previous close; callers drop it before training.
    pub fn build(series: &PriceSeries) -> Vec<FeatureVector> {
        let bars = series.bars();
        let mut rows = Vec::with_capacity(bars.len());

        for i in 0..bars.len() {
            let start = i.saturating_sub(4);
            let window = &bars[start..=i];

            let moving_avg_5 = mean(window.iter().map(|b| b.close));
            let volume_ma_5 = mean(window.iter().map(|b| b.volume));
            let previous_close = if i == 0 {
                bars[0].close
            } else {
                bars[i - 1].close
            };

            let returns: Vec<f64> = window
                .windows(2)
                .map(|pair| pair[1].close / pair[0].close - 1.0)
                .collect();
            let volatility_5 = sample_std(&returns);

            rows.push(FeatureVector {
                moving_avg_5,
                previous_close,
                volume_ma_5,
                volatility_5,
            });
        }

        rows
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut n = 0usize;
    for v in values {
        sum += v;
        n += 1;
    }
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

/// Sample standard deviation; zero when fewer than two values exist
fn sample_std(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let variance =
        values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (n - 1) as f64;
    variance.sqrt()
}
