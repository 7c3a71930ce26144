//! News sentiment scoring
//!
//! Maps headline text to a scalar in [-1, 1] using VADER, boosted with a
//! financial keyword lexicon that captures market jargon VADER's general
//! dictionary misses. Headline lists are averaged with extreme averages
//! dampened, so one breathless headline cannot pin the score to ±1.

use crate::types::SentimentLabel;
use vader_sentiment::SentimentIntensityAnalyzer;

/// Financial keywords and their score contributions
const BULLISH_KEYWORDS: &[(&str, f64)] = &[
    ("surge", 0.4),
    ("surges", 0.4),
    ("rally", 0.4),
    ("rallies", 0.4),
    ("soar", 0.5),
    ("soars", 0.5),
    ("beats expectations", 0.4),
    ("record high", 0.4),
    ("record revenue", 0.4),
    ("all-time high", 0.5),
    ("upgrade", 0.3),
    ("upgraded", 0.3),
    ("buyback", 0.3),
    ("breakout", 0.3),
    ("breakthrough", 0.4),
    ("strong growth", 0.4),
    ("partnership", 0.2),
    ("bullish", 0.5),
    ("outperform", 0.3),
    ("raises guidance", 0.4),
];

const BEARISH_KEYWORDS: &[(&str, f64)] = &[
    ("crash", -0.5),
    ("crashes", -0.5),
    ("plunge", -0.5),
    ("plunges", -0.5),
    ("slump", -0.4),
    ("misses expectations", -0.4),
    ("lawsuit", -0.4),
    ("probe", -0.3),
    ("investigation", -0.3),
    ("recall", -0.3),
    ("downgrade", -0.3),
    ("downgraded", -0.3),
    ("layoffs", -0.4),
    ("fraud", -0.5),
    ("sell-off", -0.4),
    ("selloff", -0.4),
    ("bearish", -0.5),
    ("cuts guidance", -0.4),
    ("headwinds", -0.3),
    ("bankruptcy", -0.6),
];

/// VADER-based analyzer with financial keyword boosting
pub struct SentimentAnalyzer {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }

    /// Score a single text in [-1, 1]. Blank or unscorable text is neutral.
    pub fn analyze(&self, text: &str) -> f64 {
        let cleaned = clean_text(text);
        if cleaned.is_empty() {
            return 0.0;
        }

        let scores = self.analyzer.polarity_scores(&cleaned);
        let vader_score = scores["compound"];
        let boost = self.financial_boost(&cleaned);

        (vader_score + boost * 0.5).clamp(-1.0, 1.0)
    }

    /// Average score over a headline list, dampened at the extremes and
    /// rounded to three decimals. An empty list is neutral.
    pub fn score_headlines(&self, headlines: &[String]) -> f64 {
        let scores: Vec<f64> = headlines
            .iter()
            .filter(|h| !clean_text(h).is_empty())
            .map(|h| self.analyze(h))
            .collect();

        if scores.is_empty() {
            return 0.0;
        }

        let avg = scores.iter().sum::<f64>() / scores.len() as f64;
        round3(dampen(avg))
    }

    /// Display bucket for a score
    pub fn label(score: f64) -> SentimentLabel {
        SentimentLabel::from_score(score)
    }

    fn financial_boost(&self, text: &str) -> f64 {
        let lower = text.to_lowercase();
        let mut boost = 0.0;
        for (keyword, score) in BULLISH_KEYWORDS {
            if lower.contains(keyword) {
                boost += score;
            }
        }
        for (keyword, score) in BEARISH_KEYWORDS {
            if lower.contains(keyword) {
                boost += score;
            }
        }
        boost
    }
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip everything but letters, digits, whitespace, and basic punctuation,
/// then collapse runs of whitespace
fn clean_text(text: &str) -> String {
    let kept: String = text
        .chars()
        .filter(|c| {
            c.is_alphanumeric()
                || c.is_whitespace()
                || matches!(c, '-' | '.' | '!' | '?' | ',' | ':' | ';' | '"' | '\'')
        })
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Financial text runs hot; pull uniform extremes back toward the center
fn dampen(avg: f64) -> f64 {
    if avg > 0.8 {
        0.6
    } else if avg < -0.8 {
        -0.6
    } else {
        avg
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
