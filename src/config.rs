use crate::error::{Error, Result};
use crate::web::DEFAULT_MAX_CANDIDATES;
use std::env;

pub const DEFAULT_SITES: &[&str] = &[
    "https://www.ansa.it",
    "https://www.repubblica.it",
    "https://www.corriere.it",
    "https://www.ilsole24ore.com",
    "https://www.lastampa.it",
    "https://www.ilgiornale.it",
];

#[derive(Debug, Clone)]
pub struct Config {
    pub request_timeout_secs: u64,
    pub concurrency_limit: usize,
    pub max_articles_per_site: usize,
    pub output_dir: String,
    pub database_path: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let request_timeout_secs = parse_var("CRAWLER_REQUEST_TIMEOUT")?.unwrap_or(30);
        let concurrency_limit = parse_var("CRAWLER_CONCURRENCY")?.unwrap_or(5);
        let max_articles_per_site =
            parse_var("CRAWLER_MAX_ARTICLES_PER_SITE")?.unwrap_or(DEFAULT_MAX_CANDIDATES);

        if concurrency_limit == 0 {
            return Err(Error::Config(
                "CRAWLER_CONCURRENCY must be at least 1".to_string(),
            ));
        }

        let output_dir = env::var("CRAWLER_OUTPUT_DIR").unwrap_or_else(|_| "reports".to_string());

        let database_path = env::var("CRAWLER_DATABASE_PATH")
            .ok()
            .filter(|v| !v.trim().is_empty());

        Ok(Self {
            request_timeout_secs,
            concurrency_limit,
            max_articles_per_site,
            output_dir,
            database_path,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            concurrency_limit: 5,
            max_articles_per_site: DEFAULT_MAX_CANDIDATES,
            output_dir: "reports".to_string(),
            database_path: None,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::Config(format!("{} is not a valid number: {}", name, raw))),
        Err(_) => Ok(None),
    }
}

#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    pub max_articles_per_site: usize,
    pub concurrency_limit: usize,
}

impl From<&Config> for CrawlerConfig {
    fn from(config: &Config) -> Self {
        Self {
            max_articles_per_site: config.max_articles_per_site,
            concurrency_limit: config.concurrency_limit,
        }
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crawler_defaults_follow_extraction_cap() {
        let crawler = CrawlerConfig::default();
        assert_eq!(crawler.max_articles_per_site, DEFAULT_MAX_CANDIDATES);
        assert_eq!(crawler.concurrency_limit, 5);
    }

    #[test]
    fn test_parse_var_missing_is_none() {
        let value: Option<u64> = parse_var("MARKETCRAWLER_TEST_UNSET_VARIABLE").unwrap();
        assert!(value.is_none());
    }
}
