use chrono::Utc;
use std::sync::Arc;

use crate::models::{truncate_chars, Candidate, TaggedArticle, MAX_CONTENT_CHARS};
use crate::sentiment::SentimentScorer;
use crate::taxonomy::{find_categories, MarketAreaConfig};

pub struct ArticleClassifier {
    config: Arc<MarketAreaConfig>,
}

impl ArticleClassifier {
    pub fn new(config: Arc<MarketAreaConfig>) -> Self {
        Self { config }
    }

    /// Tags `content` and builds the article, or returns `None` when it
    /// mentions no tracked market or no tracked location.
    ///
    /// The scorer only runs for articles that pass the relevance filter.
    pub fn classify(
        &self,
        candidate: &Candidate,
        content: &str,
        scorer: &dyn SentimentScorer,
    ) -> Option<TaggedArticle> {
        let markets = find_categories(content, &self.config.markets);
        if markets.is_empty() {
            return None;
        }

        let locations = find_categories(content, &self.config.locations);
        if locations.is_empty() {
            return None;
        }

        let sentiment_score = scorer.score(content);

        Some(TaggedArticle {
            title: candidate.title.clone(),
            content: truncate_chars(content, MAX_CONTENT_CHARS).to_string(),
            url: candidate.url.clone(),
            discovered_at: Utc::now(),
            markets,
            locations,
            sentiment_score,
        })
    }
}
