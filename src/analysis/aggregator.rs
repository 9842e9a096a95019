use std::collections::BTreeMap;

use crate::models::{Aggregation, MatrixEntry, SentimentStats, TaggedArticle};

/// Read-only scan over a run's tagged articles.
///
/// Categories and pairs without any matching article are left out; no
/// zero-count entry is ever produced.
pub struct Aggregator;

impl Aggregator {
    pub fn new() -> Self {
        Self
    }

    pub fn aggregate(
        &self,
        articles: &[TaggedArticle],
        tracked_markets: &[String],
        tracked_locations: &[String],
    ) -> Aggregation {
        let markets = self.by_category(tracked_markets, articles, |a, m| a.has_market(m));
        let locations = self.by_category(tracked_locations, articles, |a, l| a.has_location(l));

        let mut matrix = BTreeMap::new();
        for market in tracked_markets {
            for location in tracked_locations {
                let scores = articles
                    .iter()
                    .filter(|a| a.has_market(market) && a.has_location(location))
                    .map(|a| a.sentiment_score);

                if let Some(stats) = SentimentStats::from_scores(scores) {
                    matrix.insert(
                        MatrixEntry::key(market, location),
                        MatrixEntry {
                            market: market.clone(),
                            location: location.clone(),
                            stats,
                        },
                    );
                }
            }
        }

        tracing::debug!(
            "Aggregated {} articles: {} markets, {} locations, {} pairs",
            articles.len(),
            markets.len(),
            locations.len(),
            matrix.len()
        );

        Aggregation {
            markets,
            locations,
            matrix,
        }
    }

    fn by_category<F>(
        &self,
        tracked: &[String],
        articles: &[TaggedArticle],
        matches: F,
    ) -> BTreeMap<String, SentimentStats>
    where
        F: Fn(&TaggedArticle, &str) -> bool,
    {
        tracked
            .iter()
            .filter_map(|id| {
                let scores = articles
                    .iter()
                    .filter(|a| matches(*a, id.as_str()))
                    .map(|a| a.sentiment_score);
                SentimentStats::from_scores(scores).map(|stats| (id.clone(), stats))
            })
            .collect()
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::Trend;
    use chrono::Utc;

    pub(crate) fn article(score: f64, markets: &[&str], locations: &[&str]) -> TaggedArticle {
        TaggedArticle {
            title: format!("articolo {}", score),
            content: String::new(),
            url: format!("https://example.com/{}", score),
            discovered_at: Utc::now(),
            markets: markets.iter().map(|s| s.to_string()).collect(),
            locations: locations.iter().map(|s| s.to_string()).collect(),
            sentiment_score: score,
        }
    }

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_market_mean() {
        let articles = vec![
            article(80.0, &["tecnologia"], &["italia"]),
            article(40.0, &["tecnologia"], &["italia"]),
        ];
        let aggregation =
            Aggregator::new().aggregate(&articles, &ids(&["tecnologia"]), &ids(&["italia"]));

        let stats = &aggregation.markets["tecnologia"];
        assert_eq!(stats.article_count, 2);
        assert_eq!(stats.average_sentiment, 60.0);
        assert_eq!(stats.sentiment_trend, Trend::Neutral);
    }

    #[test]
    fn test_no_zero_count_entries() {
        let articles = vec![article(70.0, &["a"], &["x"])];
        let aggregation =
            Aggregator::new().aggregate(&articles, &ids(&["a", "b"]), &ids(&["x", "y"]));

        assert_eq!(aggregation.markets.len(), 1);
        assert!(!aggregation.markets.contains_key("b"));
        assert!(!aggregation.locations.contains_key("y"));
        assert!(aggregation
            .markets
            .values()
            .chain(aggregation.locations.values())
            .chain(aggregation.matrix.values().map(|e| &e.stats))
            .all(|s| s.article_count > 0));
    }

    #[test]
    fn test_matrix_completeness() {
        let articles = vec![article(55.0, &["A"], &["X", "Y"])];
        let aggregation =
            Aggregator::new().aggregate(&articles, &ids(&["A", "B"]), &ids(&["X", "Y"]));

        let keys: Vec<&String> = aggregation.matrix.keys().collect();
        assert_eq!(keys, vec!["A_X", "A_Y"]);
        assert_eq!(aggregation.matrix["A_Y"].market, "A");
        assert_eq!(aggregation.matrix["A_Y"].location, "Y");
    }

    #[test]
    fn test_untracked_categories_ignored() {
        let articles = vec![article(55.0, &["A", "C"], &["X"])];
        let aggregation = Aggregator::new().aggregate(&articles, &ids(&["A"]), &ids(&["X"]));

        assert!(!aggregation.markets.contains_key("C"));
        assert_eq!(aggregation.matrix.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let aggregation = Aggregator::new().aggregate(&[], &ids(&["A"]), &ids(&["X"]));
        assert!(aggregation.markets.is_empty());
        assert!(aggregation.locations.is_empty());
        assert!(aggregation.matrix.is_empty());
    }

    #[test]
    fn test_deterministic() {
        let articles = vec![
            article(12.3, &["A", "B"], &["X"]),
            article(77.7, &["B"], &["X", "Y"]),
            article(45.5, &["A"], &["Y"]),
        ];
        let markets = ids(&["A", "B"]);
        let locations = ids(&["X", "Y"]);

        let first = Aggregator::new().aggregate(&articles, &markets, &locations);
        let second = Aggregator::new().aggregate(&articles, &markets, &locations);
        assert_eq!(first, second);
    }
}
