//! Tests for core types

#[cfg(test)]
mod tests {
    use super::super::error::SentinelError;
    use super::super::types::*;
    use chrono::{Days, NaiveDate};

    fn bar(day: u64, close: f64) -> PriceBar {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Days::new(day);
        PriceBar {
            date,
            open: close - 0.5,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 10_000.0,
        }
    }

    #[test]
    fn test_series_sorts_by_date() {
        let series =
            PriceSeries::from_bars(vec![bar(2, 102.0), bar(0, 100.0), bar(1, 101.0)]).unwrap();

        let dates: Vec<_> = series.bars().iter().map(|b| b.date).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
        assert_eq!(series.latest_close(), 102.0);
    }

    #[test]
    fn test_series_dedups_last_wins() {
        let series =
            PriceSeries::from_bars(vec![bar(0, 100.0), bar(1, 101.0), bar(1, 999.0)]).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.latest_close(), 999.0);
    }

    #[test]
    fn test_empty_series_is_rejected() {
        let err = PriceSeries::from_bars(Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            SentinelError::DataInsufficient { needed: 1, got: 0 }
        ));
    }

    #[test]
    fn test_series_is_never_empty() {
        let series = PriceSeries::from_bars(vec![bar(0, 50.0)]).unwrap();
        assert!(!series.is_empty());
        assert_eq!(series.len(), 1);
        assert_eq!(series.latest().close, 50.0);
    }

    #[test]
    fn test_closes_iterates_in_order() {
        let series =
            PriceSeries::from_bars(vec![bar(0, 1.0), bar(1, 2.0), bar(2, 3.0)]).unwrap();
        let closes: Vec<f64> = series.closes().collect();
        assert_eq!(closes, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_sentiment_label_bands() {
        assert_eq!(SentimentLabel::from_score(0.8), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_score(0.5), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_score(0.3), SentimentLabel::SlightlyPositive);
        assert_eq!(SentimentLabel::from_score(0.1), SentimentLabel::SlightlyPositive);
        assert_eq!(SentimentLabel::from_score(0.0), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_score(-0.1), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_score(-0.3), SentimentLabel::SlightlyNegative);
        assert_eq!(SentimentLabel::from_score(-0.5), SentimentLabel::SlightlyNegative);
        assert_eq!(SentimentLabel::from_score(-0.8), SentimentLabel::Negative);
    }

    #[test]
    fn test_sentiment_label_display() {
        assert_eq!(SentimentLabel::Positive.to_string(), "positive");
        assert_eq!(SentimentLabel::SlightlyNegative.to_string(), "slightly negative");
    }

    #[test]
    fn test_price_bar_serde_roundtrip() {
        let original = bar(3, 123.45);
        let json = serde_json::to_string(&original).unwrap();
        let back: PriceBar = serde_json::from_str(&json).unwrap();
        assert_eq!(original, back);
    }
}
