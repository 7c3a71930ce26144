//! News headline sources
//!
//! Headlines feed the sentiment scorer. The live feed is a configurable
//! JSON endpoint; when it is unset, unreachable, or empty the pipeline
//! falls back to canned templates so an analysis run always has something
//! to score. Empty news is a normal condition, never an error.

use crate::config::NewsConfig;
use crate::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

/// Supplies recent headlines for a ticker
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn fetch_headlines(&self, ticker: &str) -> Result<Vec<String>>;
}

/// HTTP headline feed returning a JSON array, either of plain strings or
/// of objects carrying a `title` field
pub struct HeadlineFeed {
    http: Client,
    feed_url: Option<String>,
    max_headlines: usize,
}

impl HeadlineFeed {
    pub fn new(config: &NewsConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            feed_url: config.feed_url.clone(),
            max_headlines: config.max_headlines,
        })
    }
}

#[async_trait]
impl NewsSource for HeadlineFeed {
    async fn fetch_headlines(&self, ticker: &str) -> Result<Vec<String>> {
        let Some(url) = &self.feed_url else {
            debug!("no news feed configured");
            return Ok(Vec::new());
        };

        let payload: Value = self
            .http
            .get(url)
            .query(&[("ticker", ticker)])
            .send()
            .await?
            .json()
            .await?;

        let headlines = parse_headlines(&payload, self.max_headlines);
        debug!("news feed returned {} headlines for {}", headlines.len(), ticker);
        Ok(headlines)
    }
}

/// Accept `["headline", ...]` as well as `[{"title": "headline"}, ...]`
fn parse_headlines(payload: &Value, max: usize) -> Vec<String> {
    let Some(items) = payload.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Object(obj) => obj.get("title").and_then(Value::as_str).map(String::from),
            _ => None,
        })
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .take(max)
        .collect()
}

/// Deterministic stand-in headlines used when the feed yields nothing
pub fn fallback_headlines(ticker: &str) -> Vec<String> {
    vec![
        format!("{} posts quarterly results, performance draws attention", ticker),
        format!("Analysts revisit {} price targets after latest filings", ticker),
        format!("{} faces competitive pressure in its core market", ticker),
        format!("Institutional investors adjust positions in {}", ticker),
        format!("{} announces partnership, market reaction mixed", ticker),
    ]
}
