//! Error types for the sentinel

use thiserror::Error;

/// Result type alias using SentinelError
pub type Result<T> = std::result::Result<T, SentinelError>;

/// Main error type
///
/// The prediction pipeline distinguishes failures that trigger an internal
/// fallback from failures that abort the whole analysis request. Only an
/// unavailable upstream is allowed to abort; everything model-internal
/// degrades and is logged instead.
#[derive(Error, Debug)]
pub enum SentinelError {
    /// Market data upstream has no usable data. Fatal for the request.
    #[error("Upstream data unavailable: {0}")]
    Upstream(String),

    /// Too few bars to train or infer. Normal for thinly-traded tickers.
    #[error("Insufficient data: need {needed} usable bars, have {got}")]
    DataInsufficient { needed: usize, got: usize },

    /// Model fit or scoring failed. The predictor stays untrained.
    #[error("Training failed: {0}")]
    Training(String),

    /// Feature or prediction step failed. A single call falls back.
    #[error("Inference failed: {0}")]
    Inference(String),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SentinelError {
    /// Whether the pipeline recovers from this error with a fallback path
    /// instead of failing the analysis request.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SentinelError::DataInsufficient { .. }
                | SentinelError::Training(_)
                | SentinelError::Inference(_)
        )
    }
}
