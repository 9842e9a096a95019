use vader_sentiment::SentimentIntensityAnalyzer;

use crate::sentiment::scorer::{normalize_polarity, SentimentScorer, NEUTRAL_SCORE};

/// Lexicon-based scorer using the VADER compound polarity.
pub struct VaderScorer {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl VaderScorer {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }
}

impl Default for VaderScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer for VaderScorer {
    fn score(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return NEUTRAL_SCORE;
        }

        let scores = self.analyzer.polarity_scores(text);
        match scores.get("compound") {
            Some(&compound) => normalize_polarity(compound),
            None => {
                tracing::error!("Sentiment analysis returned no compound score");
                NEUTRAL_SCORE
            }
        }
    }

    fn name(&self) -> &str {
        "vader"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_is_neutral() {
        let scorer = VaderScorer::new();
        assert_eq!(scorer.score(""), NEUTRAL_SCORE);
        assert_eq!(scorer.score("   "), NEUTRAL_SCORE);
    }

    #[test]
    fn test_scores_stay_in_range() {
        let scorer = VaderScorer::new();
        let positive = scorer.score("This is a great, wonderful and excellent result!");
        let negative = scorer.score("A terrible, horrible and awful disaster.");

        assert!(positive > NEUTRAL_SCORE && positive <= 100.0);
        assert!(negative < NEUTRAL_SCORE && negative >= 0.0);
    }
}
