//! Base inference from the latest feature row
//!
//! Rebuilds features over the series at call time, applies the stored
//! standardization, and runs the selected regressor. Failures never reach
//! the top level; the predictor swaps in the simple fallback path instead.

use crate::error::{Result, SentinelError};
use crate::predictor::features::FeatureBuilder;
use crate::predictor::training::TrainedModel;
use crate::types::PriceSeries;

/// Minimum bars for a meaningful latest feature row
pub const MIN_INFERENCE_BARS: usize = 5;

pub struct Estimator;

impl Estimator {
    /// Base price estimate from the most recent feature row
    pub fn predict_base(model: &TrainedModel, series: &PriceSeries) -> Result<f64> {
        if series.len() < MIN_INFERENCE_BARS {
            return Err(SentinelError::DataInsufficient {
                needed: MIN_INFERENCE_BARS,
                got: series.len(),
            });
        }

        let rows = FeatureBuilder::build(series);
        let latest = rows
            .last()
            .ok_or_else(|| SentinelError::Inference("no feature rows".to_string()))?;
        model.predict_row(latest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::features::FeatureBuilder;
    use crate::predictor::training::ModelSelector;
    use crate::types::PriceBar;
    use chrono::{Days, NaiveDate};

    fn make_series(n: usize) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let bars = (0..n)
            .map(|i| {
                let close = 50.0 + i as f64 * 0.5 + ((i as f64) * 0.9).sin();
                PriceBar {
                    date: start + Days::new(i as u64),
                    open: close - 0.2,
                    high: close + 0.5,
                    low: close - 0.5,
                    close,
                    volume: 5_000.0 + (i % 3) as f64 * 700.0,
                }
            })
            .collect();
        PriceSeries::from_bars(bars).unwrap()
    }

    fn train(series: &PriceSeries) -> TrainedModel {
        let features = FeatureBuilder::build(series)[1..].to_vec();
        let targets: Vec<f64> = series.closes().skip(1).collect();
        ModelSelector::new(42, 20).train(&features, &targets).unwrap()
    }

    #[test]
    fn test_short_series_is_data_insufficient() {
        let model = train(&make_series(30));
        let short = make_series(4);

        let err = Estimator::predict_base(&model, &short).unwrap_err();
        assert!(matches!(err, SentinelError::DataInsufficient { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_base_estimate_is_near_recent_closes() {
        let series = make_series(30);
        let model = train(&series);

        let base = Estimator::predict_base(&model, &series).unwrap();
        let last = series.latest_close();
        assert!(base.is_finite());
        assert!(
            (base - last).abs() / last < 0.25,
            "base {} strays too far from latest close {}",
            base,
            last
        );
    }

    #[test]
    fn test_repeated_inference_is_stable() {
        let series = make_series(25);
        let model = train(&series);

        let a = Estimator::predict_base(&model, &series).unwrap();
        let b = Estimator::predict_base(&model, &series).unwrap();
        assert_eq!(a, b);
    }
}
