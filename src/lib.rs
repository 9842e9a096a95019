pub mod config;
pub mod error;
pub mod models;
pub mod taxonomy;
pub mod sentiment;
pub mod web;
pub mod analysis;
pub mod storage;

pub use config::{Config, CrawlerConfig, DEFAULT_SITES};
pub use error::{Error, Result};
pub use taxonomy::MarketAreaConfig;
pub use sentiment::{SentimentScorer, VaderScorer};
pub use web::{HttpFetcher, PageSource};
pub use analysis::{CrawlOutcome, CrawlPipeline};
pub use storage::Storage;
