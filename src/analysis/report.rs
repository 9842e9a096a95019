use chrono::{DateTime, Utc};

use crate::analysis::aggregator::Aggregator;
use crate::models::{Report, TaggedArticle};

pub struct ReportAssembler {
    aggregator: Aggregator,
    tracked_markets: Vec<String>,
    tracked_locations: Vec<String>,
}

impl ReportAssembler {
    pub fn new(tracked_markets: Vec<String>, tracked_locations: Vec<String>) -> Self {
        Self {
            aggregator: Aggregator::new(),
            tracked_markets,
            tracked_locations,
        }
    }

    pub fn assemble(&self, articles: &[TaggedArticle]) -> Report {
        self.assemble_at(articles, Utc::now())
    }

    pub fn assemble_at(&self, articles: &[TaggedArticle], timestamp: DateTime<Utc>) -> Report {
        let aggregation =
            self.aggregator
                .aggregate(articles, &self.tracked_markets, &self.tracked_locations);

        Report {
            timestamp,
            total_articles: articles.len(),
            markets: aggregation.markets,
            locations: aggregation.locations,
            matrix: aggregation.matrix,
        }
    }
}
