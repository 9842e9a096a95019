pub mod client;
pub mod extractor;

pub use client::{HttpFetcher, PageSource};
pub use extractor::{extract_candidates, extract_text, DEFAULT_MAX_CANDIDATES};
