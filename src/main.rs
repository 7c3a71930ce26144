//! Market Sentinel
//!
//! A single-user market analysis dashboard for the terminal.

use clap::{Parser, Subcommand};
use market_sentinel::{
    config::Config,
    data::source_from_config,
    news::HeadlineFeed,
    pipeline::AnalysisPipeline,
    storage::Database,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "market-sentinel")]
#[command(about = "Fetch, score, and estimate a ticker's next price move")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a full analysis for a ticker and store the result
    Analyze {
        /// Ticker symbol, e.g. AAPL or 000001.SZ
        ticker: String,
    },
    /// Show stored analysis runs
    History {
        /// Only show runs for this ticker
        #[arg(short, long)]
        ticker: Option<String>,
        /// Number of runs to show
        #[arg(short, long, default_value = "50")]
        limit: i64,
    },
    /// Show model diagnostics for a ticker without storing anything
    Info {
        ticker: String,
    },
    /// Delete all stored analysis runs
    ClearHistory,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Analyze { ticker } => analyze(config, &ticker).await,
        Commands::History { ticker, limit } => show_history(config, ticker.as_deref(), limit).await,
        Commands::Info { ticker } => show_info(config, &ticker).await,
        Commands::ClearHistory => clear_history(config).await,
    }
}

async fn analyze(config: Config, ticker: &str) -> anyhow::Result<()> {
    let db = Database::connect(&config.database.path).await?;
    let data = source_from_config(&config.market_data)?;
    let news = Box::new(HeadlineFeed::new(&config.news)?);
    let pipeline = AnalysisPipeline::new(data, news, db, config.predictor.clone());

    let report = pipeline.run(ticker).await?;
    let delta = report.prediction.price - report.current_price;

    println!("\n📈 Analysis: {}\n", report.ticker);
    println!("Current price:    ${:.2}", report.current_price);
    println!(
        "Sentiment:        {:+.3} ({})",
        report.sentiment_score, report.sentiment_label
    );
    println!(
        "Predicted price:  ${:.2} ({:+.2}%)",
        report.prediction.price,
        delta / report.current_price * 100.0
    );
    println!("Confidence:       {:.0}%", report.prediction.confidence * 100.0);
    println!("Model:            {}", report.model.model_kind);

    println!("\n📰 Headlines:");
    for (i, headline) in report.headlines.iter().enumerate() {
        println!("  {}. {}", i + 1, headline);
    }

    println!("\nSaved as record #{}", report.record_id);
    Ok(())
}

async fn show_history(config: Config, ticker: Option<&str>, limit: i64) -> anyhow::Result<()> {
    let db = Database::connect(&config.database.path).await?;
    let history = db.fetch_history(ticker, limit).await?;

    if history.is_empty() {
        println!("No analysis history yet.");
        return Ok(());
    }

    println!("\n📊 Analysis history ({} runs):\n", history.len());
    println!(
        "{:>5} {:<20} {:<10} {:>10} {:>10} {:>8} {:>9}",
        "id", "when", "ticker", "price", "predicted", "chg%", "sentiment"
    );
    println!("{}", "-".repeat(78));

    for rec in &history {
        println!(
            "{:>5} {:<20} {:<10} {:>10.2} {:>10.2} {:>+7.2}% {:>+9.3}",
            rec.id,
            rec.created_at.format("%Y-%m-%d %H:%M").to_string(),
            rec.ticker,
            rec.current_price,
            rec.predicted_price,
            rec.change_percent,
            rec.sentiment_score,
        );
    }

    Ok(())
}

async fn show_info(config: Config, ticker: &str) -> anyhow::Result<()> {
    let db = Database::connect(&config.database.path).await?;
    let data = source_from_config(&config.market_data)?;
    let news = Box::new(HeadlineFeed::new(&config.news)?);
    let pipeline = AnalysisPipeline::new(data, news, db, config.predictor.clone());

    let info = pipeline.model_info(ticker).await?;

    println!("\n🔍 Model info: {}\n", info.ticker);
    println!("Trained:    {}", if info.is_trained { "yes" } else { "no" });
    println!("Model:      {}", info.model_kind);
    if let Some(r2) = info.test_r2 {
        println!("Test R2:    {:.3}", r2);
    }
    println!("Features:   {}", info.features.join(", "));
    Ok(())
}

async fn clear_history(config: Config) -> anyhow::Result<()> {
    let db = Database::connect(&config.database.path).await?;
    let removed = db.clear_history().await?;
    println!("✅ Removed {} stored runs", removed);
    Ok(())
}
