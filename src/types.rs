//! Core data types

use crate::error::{Result, SentinelError};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One daily OHLCV observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// An ordered series of price bars.
///
/// Invariants: strictly increasing dates, no duplicates, at least one bar.
/// Construction sorts and collapses duplicate dates (last wins), so callers
/// can hand in upstream data as-is.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn from_bars(mut bars: Vec<PriceBar>) -> Result<Self> {
        if bars.is_empty() {
            return Err(SentinelError::DataInsufficient { needed: 1, got: 0 });
        }
        bars.sort_by_key(|b| b.date);
        // Last bar wins on duplicate dates
        bars.reverse();
        bars.dedup_by_key(|b| b.date);
        bars.reverse();
        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn latest(&self) -> &PriceBar {
        self.bars.last().expect("series is never empty")
    }

    /// Close of the most recent bar, used as the current price of a request
    pub fn latest_close(&self) -> f64 {
        self.latest().close
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.bars.iter().map(|b| b.close)
    }
}

/// Display bucket for a sentiment scalar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    SlightlyPositive,
    Neutral,
    SlightlyNegative,
    Negative,
}

impl SentimentLabel {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.5 {
            SentimentLabel::Positive
        } else if score >= 0.1 {
            SentimentLabel::SlightlyPositive
        } else if score >= -0.1 {
            SentimentLabel::Neutral
        } else if score >= -0.5 {
            SentimentLabel::SlightlyNegative
        } else {
            SentimentLabel::Negative
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::SlightlyPositive => "slightly positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::SlightlyNegative => "slightly negative",
            SentimentLabel::Negative => "negative",
        };
        write!(f, "{}", s)
    }
}

/// A persisted analysis run
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AnalysisRecord {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub ticker: String,
    pub current_price: f64,
    pub predicted_price: f64,
    pub sentiment_score: f64,
    pub confidence_score: f64,
    pub model_kind: String,
    /// Predicted move relative to the current price, in percent
    pub change_percent: f64,
}

/// Input for appending one analysis run to the store
#[derive(Debug, Clone)]
pub struct NewAnalysisRecord {
    pub ticker: String,
    pub current_price: f64,
    pub predicted_price: f64,
    pub sentiment_score: f64,
    pub confidence_score: f64,
    pub model_kind: String,
}
