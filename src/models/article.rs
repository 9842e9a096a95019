use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MAX_CONTENT_CHARS: usize = 1000;
pub const MAX_PREVIEW_CHARS: usize = 500;
pub const SUMMARY_PREVIEW_CHARS: usize = 200;

/// A raw item pulled off a listing page, before relevance filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub title: String,
    pub url: String,
    pub preview: String,
}

/// A candidate that matched at least one tracked market and one tracked
/// location. Never constructed with empty `markets` or `locations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggedArticle {
    pub title: String,
    pub content: String,
    pub url: String,
    pub discovered_at: DateTime<Utc>,
    pub markets: Vec<String>,
    pub locations: Vec<String>,
    pub sentiment_score: f64,
}

impl TaggedArticle {
    pub fn has_market(&self, market: &str) -> bool {
        self.markets.iter().any(|m| m == market)
    }

    pub fn has_location(&self, location: &str) -> bool {
        self.locations.iter().any(|l| l == location)
    }
}

/// Flat record persisted next to the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleSummary {
    pub title: String,
    pub url: String,
    pub market_areas: Vec<String>,
    pub locations: Vec<String>,
    pub sentiment_score: f64,
    pub content_preview: String,
}

impl From<&TaggedArticle> for ArticleSummary {
    fn from(article: &TaggedArticle) -> Self {
        Self {
            title: article.title.clone(),
            url: article.url.clone(),
            market_areas: article.markets.clone(),
            locations: article.locations.clone(),
            sentiment_score: article.sentiment_score,
            content_preview: content_preview(&article.content),
        }
    }
}

/// First `SUMMARY_PREVIEW_CHARS` characters, with `...` appended when
/// anything was cut.
pub fn content_preview(content: &str) -> String {
    if content.chars().count() > SUMMARY_PREVIEW_CHARS {
        format!("{}...", truncate_chars(content, SUMMARY_PREVIEW_CHARS))
    } else {
        content.to_string()
    }
}

/// Cuts `text` to at most `max` characters on a char boundary.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
