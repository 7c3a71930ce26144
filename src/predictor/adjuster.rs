//! Sentiment blending and output bounding
//!
//! Folds the news sentiment scalar into the base estimate, or synthesizes a
//! plausible estimate when no model is available. The hard ±5% clamp around
//! the current price is the output guarantee of the whole pipeline; no
//! model output can escape it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Share of the blend given to the sentiment-scaled estimate
const SENTIMENT_WEIGHT: f64 = 0.3;

/// Maximum deviation from the current price, either direction
const MAX_CHANGE: f64 = 0.05;

/// Adjusts base estimates by sentiment, with a stochastic fallback path.
///
/// The noise generator is explicit and seedable so tests (and documented
/// runs) can pin the fallback output exactly.
pub struct SentimentAdjuster {
    noise: StdRng,
}

impl SentimentAdjuster {
    pub fn new(noise_seed: Option<u64>) -> Self {
        let noise = match noise_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { noise }
    }

    /// Final price estimate, rounded to cents.
    ///
    /// With a base estimate the sentiment multiplier is blended in at 30%
    /// and the result clamped to ±5% of the current price. Without one the
    /// simple path scales the current price by sentiment and benign noise.
    pub fn adjust(&mut self, base: Option<f64>, current_price: f64, sentiment: f64) -> f64 {
        let price = match base {
            Some(base) => Self::blend(base, current_price, sentiment),
            None => self.simple(current_price, sentiment),
        };
        round_cents(price)
    }

    /// Fallback when no trained model exists: up to ±2% from sentiment,
    /// times a uniform multiplier in [0.98, 1.02]
    fn simple(&mut self, current_price: f64, sentiment: f64) -> f64 {
        let sentiment_factor = 1.0 + sentiment * 0.02;
        let noise_factor: f64 = self.noise.random_range(0.98..=1.02);
        current_price * sentiment_factor * noise_factor
    }

    fn blend(base: f64, current_price: f64, sentiment: f64) -> f64 {
        let multiplier = sentiment_multiplier(sentiment);
        let adjusted =
            base * (1.0 - SENTIMENT_WEIGHT) + base * multiplier * SENTIMENT_WEIGHT;

        let lower = current_price * (1.0 - MAX_CHANGE);
        let upper = current_price * (1.0 + MAX_CHANGE);
        adjusted.clamp(lower, upper)
    }

    /// Confidence bucket from the relative size of the predicted move,
    /// with a bonus when a trained model produced the estimate
    pub fn confidence(current_price: f64, prediction: f64, is_trained: bool) -> f64 {
        if current_price <= 0.0 {
            return 0.5;
        }

        let change = (prediction - current_price).abs() / current_price;
        let mut confidence: f64 = if change <= 0.01 {
            0.9
        } else if change <= 0.03 {
            0.7
        } else if change <= 0.05 {
            0.5
        } else {
            0.3
        };

        if is_trained {
            confidence += 0.1;
        }
        confidence.min(1.0)
    }
}

/// Threshold bands mapping sentiment to a price multiplier
fn sentiment_multiplier(sentiment: f64) -> f64 {
    if sentiment >= 0.5 {
        1.005
    } else if sentiment >= 0.2 {
        1.002
    } else if sentiment <= -0.5 {
        0.995
    } else if sentiment <= -0.2 {
        0.998
    } else {
        1.0
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
