//! SQLite persistence for analysis history
//!
//! An append-only log of past analysis runs. The handle is constructed
//! explicitly from the configured path and passed to whoever needs it;
//! schema setup is idempotent and happens at connect time.

use crate::error::Result;
use crate::types::{AnalysisRecord, NewAnalysisRecord};
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::debug;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS analysis_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at TEXT NOT NULL,
    ticker TEXT NOT NULL,
    current_price REAL NOT NULL,
    predicted_price REAL NOT NULL,
    sentiment_score REAL NOT NULL,
    confidence_score REAL NOT NULL DEFAULT 0.5,
    model_kind TEXT NOT NULL DEFAULT 'Simple'
);
CREATE INDEX IF NOT EXISTS idx_history_ticker ON analysis_history(ticker);
CREATE INDEX IF NOT EXISTS idx_history_created ON analysis_history(created_at);
";

const SELECT_COLUMNS: &str = "
    id, created_at, ticker, current_price, predicted_price,
    sentiment_score, confidence_score, model_kind,
    ROUND((predicted_price - current_price) / current_price * 100, 2) AS change_percent
";

/// Analysis history store
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (and create if missing) the database at the configured path
    pub async fn connect(path: &str) -> Result<Self> {
        let expanded = shellexpand::tilde(path).into_owned();
        if let Some(parent) = Path::new(&expanded).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| crate::error::SentinelError::Internal(e.to_string()))?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(&expanded)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.init().await?;
        debug!("database ready at {}", expanded);
        Ok(db)
    }

    async fn init(&self) -> Result<()> {
        for statement in SCHEMA.split(';').filter(|s| !s.trim().is_empty()) {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Append one analysis run; returns the new row id
    pub async fn save_record(&self, record: &NewAnalysisRecord) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO analysis_history
             (created_at, ticker, current_price, predicted_price,
              sentiment_score, confidence_score, model_kind)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(Utc::now())
        .bind(record.ticker.to_uppercase())
        .bind(record.current_price)
        .bind(record.predicted_price)
        .bind(record.sentiment_score)
        .bind(record.confidence_score)
        .bind(&record.model_kind)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Recent runs, newest first, optionally filtered by ticker
    pub async fn fetch_history(
        &self,
        ticker: Option<&str>,
        limit: i64,
    ) -> Result<Vec<AnalysisRecord>> {
        let records = match ticker {
            Some(ticker) => {
                let sql = format!(
                    "SELECT {} FROM analysis_history WHERE ticker = ?
                     ORDER BY created_at DESC, id DESC LIMIT ?",
                    SELECT_COLUMNS
                );
                sqlx::query_as::<_, AnalysisRecord>(&sql)
                    .bind(ticker.to_uppercase())
                    .bind(limit)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT {} FROM analysis_history
                     ORDER BY created_at DESC, id DESC LIMIT ?",
                    SELECT_COLUMNS
                );
                sqlx::query_as::<_, AnalysisRecord>(&sql)
                    .bind(limit)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(records)
    }

    /// Remove all history; returns the number of deleted rows
    pub async fn clear_history(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM analysis_history")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn scratch_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::connect(path.to_str().unwrap()).await.unwrap();
        (dir, db)
    }

    fn record(ticker: &str, current: f64, predicted: f64) -> NewAnalysisRecord {
        NewAnalysisRecord {
            ticker: ticker.to_string(),
            current_price: current,
            predicted_price: predicted,
            sentiment_score: 0.25,
            confidence_score: 0.8,
            model_kind: "LinearRegression".to_string(),
        }
    }

    #[tokio::test]
    async fn test_save_and_fetch_roundtrip() {
        let (_dir, db) = scratch_db().await;

        let id = db.save_record(&record("aapl", 100.0, 102.0)).await.unwrap();
        assert!(id > 0);

        let history = db.fetch_history(None, 10).await.unwrap();
        assert_eq!(history.len(), 1);

        let rec = &history[0];
        assert_eq!(rec.id, id);
        assert_eq!(rec.ticker, "AAPL");
        assert_eq!(rec.current_price, 100.0);
        assert_eq!(rec.predicted_price, 102.0);
        assert_eq!(rec.model_kind, "LinearRegression");
        assert_eq!(rec.change_percent, 2.0);
    }

    #[tokio::test]
    async fn test_fetch_newest_first_and_limit() {
        let (_dir, db) = scratch_db().await;

        for i in 0..5 {
            db.save_record(&record("MSFT", 100.0, 100.0 + i as f64))
                .await
                .unwrap();
        }

        let history = db.fetch_history(None, 3).await.unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].predicted_price, 104.0);
        assert!(history[0].id > history[1].id);
    }

    #[tokio::test]
    async fn test_ticker_filter_is_case_insensitive() {
        let (_dir, db) = scratch_db().await;

        db.save_record(&record("AAPL", 100.0, 101.0)).await.unwrap();
        db.save_record(&record("MSFT", 200.0, 201.0)).await.unwrap();

        let apple = db.fetch_history(Some("aapl"), 10).await.unwrap();
        assert_eq!(apple.len(), 1);
        assert_eq!(apple[0].ticker, "AAPL");
    }

    #[tokio::test]
    async fn test_clear_history() {
        let (_dir, db) = scratch_db().await;

        db.save_record(&record("AAPL", 100.0, 101.0)).await.unwrap();
        db.save_record(&record("MSFT", 200.0, 199.0)).await.unwrap();

        let removed = db.clear_history().await.unwrap();
        assert_eq!(removed, 2);
        assert!(db.fetch_history(None, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_negative_change_percent() {
        let (_dir, db) = scratch_db().await;

        db.save_record(&record("TSLA", 200.0, 190.0)).await.unwrap();
        let history = db.fetch_history(Some("TSLA"), 1).await.unwrap();
        assert_eq!(history[0].change_percent, -5.0);
    }
}
