//! End-to-end pipeline tests

#[cfg(test)]
mod tests {
    use super::super::config::{NewsConfig, PredictorConfig};
    use super::super::data::{MockMarketDataSource, SimulatedSource};
    use super::super::error::SentinelError;
    use super::super::news::{HeadlineFeed, MockNewsSource};
    use super::super::pipeline::AnalysisPipeline;
    use super::super::storage::Database;

    async fn scratch_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sentinel.db");
        let db = Database::connect(path.to_str().unwrap()).await.unwrap();
        (dir, db)
    }

    fn predictor_config() -> PredictorConfig {
        PredictorConfig {
            split_seed: 42,
            forest_trees: 20,
            noise_seed: Some(5),
        }
    }

    fn offline_pipeline(db: Database, lookback_days: i64) -> AnalysisPipeline {
        let data = Box::new(SimulatedSource::new(lookback_days));
        // No feed configured: the pipeline falls back to canned headlines
        let news = Box::new(HeadlineFeed::new(&NewsConfig::default()).unwrap());
        AnalysisPipeline::new(data, news, db, predictor_config())
    }

    #[tokio::test]
    async fn test_full_run_persists_one_record() {
        let (_dir, db) = scratch_db().await;
        let pipeline = offline_pipeline(db.clone(), 120);

        let report = pipeline.run("aapl").await.unwrap();
        assert_eq!(report.ticker, "AAPL");
        assert!(report.prediction.price > 0.0);
        assert!((0.0..=1.0).contains(&report.prediction.confidence));
        assert!((-1.0..=1.0).contains(&report.sentiment_score));
        assert!(!report.headlines.is_empty());

        let history = db.fetch_history(Some("AAPL"), 10).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, report.record_id);
        assert_eq!(history[0].predicted_price, report.prediction.price);
        assert_eq!(history[0].model_kind, report.model.model_kind);
    }

    #[tokio::test]
    async fn test_prediction_stays_near_current_price() {
        let (_dir, db) = scratch_db().await;
        let pipeline = offline_pipeline(db, 200);

        let report = pipeline.run("MSFT").await.unwrap();
        let current = report.current_price;

        if report.model.is_trained {
            // Model path: hard ±5% clamp
            assert!(report.prediction.price >= current * 0.95);
            assert!(report.prediction.price <= current * 1.05);
        } else {
            // Simple path: sentiment factor times benign noise
            assert!(report.prediction.price >= current * 0.94);
            assert!(report.prediction.price <= current * 1.07);
        }
    }

    #[tokio::test]
    async fn test_repeated_runs_append_history() {
        let (_dir, db) = scratch_db().await;
        let pipeline = offline_pipeline(db.clone(), 90);

        pipeline.run("TSLA").await.unwrap();
        pipeline.run("TSLA").await.unwrap();
        pipeline.run("NVDA").await.unwrap();

        assert_eq!(db.fetch_history(None, 10).await.unwrap().len(), 3);
        assert_eq!(db.fetch_history(Some("TSLA"), 10).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_thin_series_still_completes() {
        // 4 bars: training skipped, simple path used, run still persists
        let (_dir, db) = scratch_db().await;
        let pipeline = offline_pipeline(db.clone(), 4);

        let report = pipeline.run("THIN").await.unwrap();
        assert!(!report.model.is_trained);
        assert_eq!(report.model.model_kind, "Simple");
        assert!(report.prediction.price > 0.0);
        assert_eq!(db.fetch_history(Some("THIN"), 10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_upstream_failure_aborts_without_persisting() {
        let (_dir, db) = scratch_db().await;

        let mut data = MockMarketDataSource::new();
        data.expect_name().return_const("mock");
        data.expect_fetch_series()
            .returning(|_| Err(SentinelError::Upstream("ticker not found".to_string())));

        let news = MockNewsSource::new();
        let pipeline = AnalysisPipeline::new(
            Box::new(data),
            Box::new(news),
            db.clone(),
            predictor_config(),
        );

        let err = pipeline.run("GONE").await.unwrap_err();
        assert!(matches!(err, SentinelError::Upstream(_)));
        assert!(db.fetch_history(None, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_news_failure_degrades_to_canned_headlines() {
        let (_dir, db) = scratch_db().await;

        let data = Box::new(SimulatedSource::new(60));
        let mut news = MockNewsSource::new();
        news.expect_fetch_headlines()
            .returning(|_| Err(SentinelError::Internal("feed down".to_string())));

        let pipeline =
            AnalysisPipeline::new(data, Box::new(news), db.clone(), predictor_config());

        let report = pipeline.run("AAPL").await.unwrap();
        assert!(!report.headlines.is_empty(), "canned fallback expected");
        assert!(report.headlines.iter().any(|h| h.contains("AAPL")));
    }

    #[tokio::test]
    async fn test_model_info_does_not_persist() {
        let (_dir, db) = scratch_db().await;
        let pipeline = offline_pipeline(db.clone(), 120);

        let info = pipeline.model_info("AAPL").await.unwrap();
        assert_eq!(info.ticker, "AAPL");
        assert!(db.fetch_history(None, 10).await.unwrap().is_empty());
    }
}
