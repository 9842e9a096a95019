pub mod scorer;
pub mod vader;

pub use scorer::{normalize_polarity, SentimentScorer, NEUTRAL_SCORE};
pub use vader::VaderScorer;
