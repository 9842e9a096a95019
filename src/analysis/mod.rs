pub mod aggregator;
pub mod classifier;
pub mod pipeline;
pub mod report;

pub use aggregator::Aggregator;
pub use classifier::ArticleClassifier;
pub use pipeline::{CrawlOutcome, CrawlPipeline, SiteSummary};
pub use report::ReportAssembler;
