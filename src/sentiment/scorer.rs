use crate::models::round2;

pub const NEUTRAL_SCORE: f64 = 50.0;

/// Maps text to a sentiment score in [0, 100].
///
/// Implementations are total: on any internal failure they return
/// [`NEUTRAL_SCORE`] instead of surfacing an error to the caller.
pub trait SentimentScorer: Send + Sync {
    fn score(&self, text: &str) -> f64;
    fn name(&self) -> &str;
}

/// Rescales a polarity in [-1, 1] to [0, 100], rounded to 2 decimals.
pub fn normalize_polarity(polarity: f64) -> f64 {
    if !polarity.is_finite() {
        return NEUTRAL_SCORE;
    }
    round2((polarity.clamp(-1.0, 1.0) + 1.0) * 50.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_polarity() {
        assert_eq!(normalize_polarity(-1.0), 0.0);
        assert_eq!(normalize_polarity(0.0), 50.0);
        assert_eq!(normalize_polarity(1.0), 100.0);
        assert_eq!(normalize_polarity(0.2468), 62.34);
    }

    #[test]
    fn test_normalize_polarity_out_of_range() {
        assert_eq!(normalize_polarity(3.0), 100.0);
        assert_eq!(normalize_polarity(f64::NAN), NEUTRAL_SCORE);
    }
}
