//! Price prediction pipeline
//!
//! Feature construction, model selection, inference, and sentiment
//! adjustment for one ticker:
//!
//! ```text
//! PriceSeries → FeatureBuilder → ModelSelector (once) → Estimator
//!                                                          ↓
//!                         sentiment scalar → SentimentAdjuster → estimate
//! ```
//!
//! A predictor is built per analysis request. Training is best-effort: thin
//! series and fit failures leave it untrained, and `predict` then uses the
//! simple fallback path. `predict` never fails for model-internal reasons.

pub mod adjuster;
pub mod estimator;
pub mod features;
pub mod training;


pub use adjuster::SentimentAdjuster;
pub use estimator::Estimator;
pub use features::{FeatureBuilder, FeatureVector, FEATURE_NAMES};
pub use training::{CandidateKind, ModelSelector, TrainedModel, MIN_TRAINING_ROWS};

use crate::config::PredictorConfig;
use crate::types::PriceSeries;
use tracing::{debug, warn};

/// Final output of one prediction call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionResult {
    /// Estimated price, rounded to cents
    pub price: f64,
    /// Confidence score in [0, 1]
    pub confidence: f64,
}

/// Diagnostics snapshot for display
#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub ticker: String,
    pub is_trained: bool,
    pub model_kind: String,
    /// Held-out R2 at selection time, when trained
    pub test_r2: Option<f64>,
    pub features: [&'static str; 4],
}

/// Binds a ticker to an optionally trained model for one analysis request
pub struct PricePredictor {
    ticker: String,
    model: Option<TrainedModel>,
    adjuster: SentimentAdjuster,
}

impl PricePredictor {
    /// Train once, best-effort. Thin history and fit failures are logged
    /// and leave the predictor untrained; they never propagate.
    pub fn train(ticker: &str, series: &PriceSeries, config: &PredictorConfig) -> Self {
        let ticker = ticker.to_uppercase();
        let selector = ModelSelector::new(config.split_seed, config.forest_trees);

        // The first row has no genuine previous close; drop it from training
        let features = FeatureBuilder::build(series);
        let features = &features[1.min(features.len())..];
        let targets: Vec<f64> = series.closes().skip(1).collect();

        let model = match selector.train(features, &targets) {
            Ok(model) => {
                debug!(
                    "{}: trained {} on {} rows",
                    ticker,
                    model.kind().name(),
                    features.len()
                );
                Some(model)
            }
            Err(e) => {
                warn!("{}: training unavailable, using simple estimates: {}", ticker, e);
                None
            }
        };

        Self {
            ticker,
            model,
            adjuster: SentimentAdjuster::new(config.noise_seed),
        }
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    /// Price estimate for the next step plus a confidence score.
    ///
    /// Inference failures fall back to the simple path for this call only;
    /// nothing model-internal ever surfaces as an error.
    pub fn predict(
        &mut self,
        series: &PriceSeries,
        current_price: f64,
        sentiment: f64,
    ) -> PredictionResult {
        let base = match &self.model {
            Some(model) => match Estimator::predict_base(model, series) {
                Ok(base) => Some(base),
                Err(e) => {
                    warn!("{}: falling back to simple estimate: {}", self.ticker, e);
                    None
                }
            },
            None => None,
        };

        let price = self.adjuster.adjust(base, current_price, sentiment);
        let confidence = SentimentAdjuster::confidence(current_price, price, self.is_trained());

        PredictionResult { price, confidence }
    }

    pub fn model_info(&self) -> ModelInfo {
        ModelInfo {
            ticker: self.ticker.clone(),
            is_trained: self.is_trained(),
            model_kind: self
                .model
                .as_ref()
                .map(|m| m.kind().name().to_string())
                .unwrap_or_else(|| "Simple".to_string()),
            test_r2: self.model.as_ref().map(|m| m.test_r2()),
            features: FEATURE_NAMES,
        }
    }
}
