use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const POSITIVE_THRESHOLD: f64 = 60.0;
pub const NEGATIVE_THRESHOLD: f64 = 40.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Positive,
    Neutral,
    Negative,
}

impl Trend {
    /// Both thresholds are inclusive on the neutral side.
    pub fn from_score(score: f64) -> Self {
        if score > POSITIVE_THRESHOLD {
            Trend::Positive
        } else if score < NEGATIVE_THRESHOLD {
            Trend::Negative
        } else {
            Trend::Neutral
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Positive => write!(f, "positive"),
            Trend::Neutral => write!(f, "neutral"),
            Trend::Negative => write!(f, "negative"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentStats {
    pub article_count: usize,
    pub average_sentiment: f64,
    pub sentiment_trend: Trend,
}

impl SentimentStats {
    /// Returns `None` for an empty set of scores. The trend is taken from
    /// the unrounded mean.
    pub fn from_scores<I>(scores: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let (count, sum) = scores
            .into_iter()
            .fold((0usize, 0.0f64), |(n, s), score| (n + 1, s + score));

        if count == 0 {
            return None;
        }

        let mean = sum / count as f64;
        Some(Self {
            article_count: count,
            average_sentiment: round2(mean),
            sentiment_trend: Trend::from_score(mean),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixEntry {
    pub market: String,
    pub location: String,
    #[serde(flatten)]
    pub stats: SentimentStats,
}

impl MatrixEntry {
    pub fn key(market: &str, location: &str) -> String {
        format!("{}_{}", market, location)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    pub markets: BTreeMap<String, SentimentStats>,
    pub locations: BTreeMap<String, SentimentStats>,
    pub matrix: BTreeMap<String, MatrixEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub timestamp: DateTime<Utc>,
    pub total_articles: usize,
    pub markets: BTreeMap<String, SentimentStats>,
    pub locations: BTreeMap<String, SentimentStats>,
    #[serde(rename = "market_location_matrix")]
    pub matrix: BTreeMap<String, MatrixEntry>,
}

impl Report {
    /// Matrix entries sorted by descending average sentiment.
    pub fn top_pairs(&self, limit: usize) -> Vec<&MatrixEntry> {
        let mut pairs: Vec<&MatrixEntry> = self.matrix.values().collect();
        pairs.sort_by(|a, b| {
            b.stats
                .average_sentiment
                .total_cmp(&a.stats.average_sentiment)
        });
        pairs.truncate(limit);
        pairs
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_boundaries() {
        assert_eq!(Trend::from_score(60.0), Trend::Neutral);
        assert_eq!(Trend::from_score(60.01), Trend::Positive);
        assert_eq!(Trend::from_score(40.0), Trend::Neutral);
        assert_eq!(Trend::from_score(39.99), Trend::Negative);
        assert_eq!(Trend::from_score(50.0), Trend::Neutral);
    }

    #[test]
    fn test_stats_mean_and_rounding() {
        let stats = SentimentStats::from_scores([80.0, 40.0]).unwrap();
        assert_eq!(stats.article_count, 2);
        assert_eq!(stats.average_sentiment, 60.0);
        assert_eq!(stats.sentiment_trend, Trend::Neutral);

        let stats = SentimentStats::from_scores([10.0, 20.0, 20.0]).unwrap();
        assert_eq!(stats.average_sentiment, 16.67);
    }

    #[test]
    fn test_trend_uses_unrounded_mean() {
        let stats = SentimentStats::from_scores([60.01, 60.0, 60.0]).unwrap();
        assert_eq!(stats.average_sentiment, 60.0);
        assert_eq!(stats.sentiment_trend, Trend::Positive);

        let stats = SentimentStats::from_scores([40.0, 39.99, 40.0]).unwrap();
        assert_eq!(stats.average_sentiment, 40.0);
        assert_eq!(stats.sentiment_trend, Trend::Negative);
    }

    #[test]
    fn test_stats_empty_is_none() {
        assert!(SentimentStats::from_scores(Vec::new()).is_none());
    }

    #[test]
    fn test_matrix_entry_serializes_flat() {
        let entry = MatrixEntry {
            market: "tecnologia".to_string(),
            location: "italia".to_string(),
            stats: SentimentStats::from_scores([90.0]).unwrap(),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["market"], "tecnologia");
        assert_eq!(value["article_count"], 1);
        assert_eq!(value["sentiment_trend"], "positive");
    }
}
