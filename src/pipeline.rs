//! Per-request analysis orchestration
//!
//! One call runs a ticker through the whole flow: fetch history → fetch
//! headlines → score sentiment → train-and-predict → persist. Only an
//! unavailable market-data upstream fails the request; every other problem
//! degrades with a logged fallback, and nothing is persisted on failure.

use crate::config::PredictorConfig;
use crate::data::MarketDataSource;
use crate::error::Result;
use crate::news::{fallback_headlines, NewsSource};
use crate::predictor::{ModelInfo, PredictionResult, PricePredictor};
use crate::sentiment::SentimentAnalyzer;
use crate::storage::Database;
use crate::types::{NewAnalysisRecord, SentimentLabel};
use tracing::{info, warn};

/// Everything one analysis run produces, for display and persistence
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub ticker: String,
    pub current_price: f64,
    pub headlines: Vec<String>,
    pub sentiment_score: f64,
    pub sentiment_label: SentimentLabel,
    pub prediction: PredictionResult,
    pub model: ModelInfo,
    /// Row id of the persisted record
    pub record_id: i64,
}

/// Owns the collaborators for analysis requests
pub struct AnalysisPipeline {
    data: Box<dyn MarketDataSource>,
    news: Box<dyn NewsSource>,
    sentiment: SentimentAnalyzer,
    db: Database,
    predictor_config: PredictorConfig,
}

impl AnalysisPipeline {
    pub fn new(
        data: Box<dyn MarketDataSource>,
        news: Box<dyn NewsSource>,
        db: Database,
        predictor_config: PredictorConfig,
    ) -> Self {
        Self {
            data,
            news,
            sentiment: SentimentAnalyzer::new(),
            db,
            predictor_config,
        }
    }

    /// Run one full analysis for a ticker
    pub async fn run(&self, ticker: &str) -> Result<AnalysisReport> {
        let ticker = ticker.to_uppercase();
        info!("analyzing {} via {}", ticker, self.data.name());

        let series = self.data.fetch_series(&ticker).await?;
        let current_price = series.latest_close();
        info!("{}: {} bars, current price {:.2}", ticker, series.len(), current_price);

        let headlines = match self.news.fetch_headlines(&ticker).await {
            Ok(headlines) if !headlines.is_empty() => headlines,
            Ok(_) => {
                warn!("{}: news feed empty, using canned headlines", ticker);
                fallback_headlines(&ticker)
            }
            Err(e) => {
                warn!("{}: news fetch failed ({}), using canned headlines", ticker, e);
                fallback_headlines(&ticker)
            }
        };

        let sentiment_score = self.sentiment.score_headlines(&headlines);
        let sentiment_label = SentimentAnalyzer::label(sentiment_score);

        let mut predictor = PricePredictor::train(&ticker, &series, &self.predictor_config);
        let prediction = predictor.predict(&series, current_price, sentiment_score);
        let model = predictor.model_info();

        let record_id = self
            .db
            .save_record(&NewAnalysisRecord {
                ticker: ticker.clone(),
                current_price,
                predicted_price: prediction.price,
                sentiment_score,
                confidence_score: prediction.confidence,
                model_kind: model.model_kind.clone(),
            })
            .await?;
        info!(
            "{}: predicted {:.2} (confidence {:.2}, {}), saved as record {}",
            ticker, prediction.price, prediction.confidence, model.model_kind, record_id
        );

        Ok(AnalysisReport {
            ticker,
            current_price,
            headlines,
            sentiment_score,
            sentiment_label,
            prediction,
            model,
            record_id,
        })
    }

    /// Train against current history and report model diagnostics only
    pub async fn model_info(&self, ticker: &str) -> Result<ModelInfo> {
        let ticker = ticker.to_uppercase();
        let series = self.data.fetch_series(&ticker).await?;
        let predictor = PricePredictor::train(&ticker, &series, &self.predictor_config);
        Ok(predictor.model_info())
    }
}
