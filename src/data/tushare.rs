//! Tushare daily-bars client
//!
//! The upstream speaks a single-endpoint JSON protocol: every call POSTs
//! `{api_name, token, params, fields}` and gets back a columnar payload of
//! `fields` names plus `items` rows. Column order is not guaranteed, so
//! rows are indexed through the `fields` array.

use crate::config::MarketDataConfig;
use crate::error::{Result, SentinelError};
use crate::types::{PriceBar, PriceSeries};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::MarketDataSource;

pub struct TushareClient {
    http: Client,
    base_url: String,
    token: String,
    lookback_days: i64,
}

#[derive(Debug, Deserialize)]
struct TushareResponse {
    code: i64,
    msg: Option<String>,
    data: Option<TushareData>,
}

#[derive(Debug, Deserialize)]
struct TushareData {
    fields: Vec<String>,
    items: Vec<Vec<Value>>,
}

impl TushareClient {
    pub fn new(config: &MarketDataConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            lookback_days: config.lookback_days,
        })
    }
}

#[async_trait]
impl MarketDataSource for TushareClient {
    async fn fetch_series(&self, ticker: &str) -> Result<PriceSeries> {
        let end = Utc::now().date_naive();
        let start = end - Duration::days(self.lookback_days);

        let body = json!({
            "api_name": "daily",
            "token": self.token,
            "params": {
                "ts_code": ticker,
                "start_date": start.format("%Y%m%d").to_string(),
                "end_date": end.format("%Y%m%d").to_string(),
            },
            "fields": "trade_date,open,high,low,close,vol",
        });

        let resp: TushareResponse = self
            .http
            .post(&self.base_url)
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        if resp.code != 0 {
            return Err(SentinelError::Upstream(format!(
                "tushare rejected the request: {}",
                resp.msg.unwrap_or_else(|| format!("code {}", resp.code))
            )));
        }

        let data = resp
            .data
            .ok_or_else(|| SentinelError::Upstream("tushare returned no payload".to_string()))?;

        let bars = parse_bars(&data.fields, &data.items);
        if bars.is_empty() {
            return Err(SentinelError::Upstream(format!("no daily bars for {}", ticker)));
        }
        debug!("tushare returned {} bars for {}", bars.len(), ticker);

        PriceSeries::from_bars(bars)
    }

    fn name(&self) -> &'static str {
        "tushare"
    }
}

/// Decode columnar rows into bars, skipping rows that fail to parse
fn parse_bars(fields: &[String], items: &[Vec<Value>]) -> Vec<PriceBar> {
    let col = |name: &str| fields.iter().position(|f| f == name);
    let (Some(date_i), Some(open_i), Some(high_i), Some(low_i), Some(close_i), Some(vol_i)) = (
        col("trade_date"),
        col("open"),
        col("high"),
        col("low"),
        col("close"),
        col("vol"),
    ) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|row| {
            let date = row
                .get(date_i)?
                .as_str()
                .and_then(|s| NaiveDate::parse_from_str(s, "%Y%m%d").ok())?;
            Some(PriceBar {
                date,
                open: value_f64(row.get(open_i)?)?,
                high: value_f64(row.get(high_i)?)?,
                low: value_f64(row.get(low_i)?)?,
                close: value_f64(row.get(close_i)?)?,
                volume: value_f64(row.get(vol_i)?)?,
            })
        })
        .collect()
}

/// The upstream mixes JSON numbers and numeric strings
fn value_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
