use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown {kind} in tracked list: {id}")]
    UnknownCategory { kind: &'static str, id: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Errors a crawl recovers from by treating the source as empty.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Fetch { .. } | Error::Network(_) | Error::Url(_))
    }
}
