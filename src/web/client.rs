use async_trait::async_trait;
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use reqwest::{header, Client, StatusCode};
use std::time::Duration;

use crate::error::{Error, Result};

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko)";

/// Anything that can hand back the text of a page.
///
/// `None` means "nothing usable from this URL"; callers treat it as zero
/// candidates, never as a fatal error.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Option<String>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::USER_AGENT, header::HeaderValue::from_str(USER_AGENT)?);
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("text/html,application/xhtml+xml"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self { client })
    }

    async fn try_fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        check_status(url, response.status())?;

        let charset = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(charset_of);

        let bytes = response.bytes().await?;
        Ok(decode_body(url, &bytes, charset.as_deref()))
    }
}

#[async_trait]
impl PageSource for HttpFetcher {
    async fn fetch_page(&self, url: &str) -> Option<String> {
        tracing::debug!("Fetching page: {}", url);
        match self.try_fetch(url).await {
            Ok(text) => Some(text),
            Err(e) if e.is_recoverable() => {
                tracing::warn!("Skipping {}: {}", url, e);
                None
            }
            Err(e) => {
                tracing::error!("Error fetching {}: {}", url, e);
                None
            }
        }
    }
}

fn check_status(url: &str, status: StatusCode) -> Result<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(Error::Fetch {
            url: url.to_string(),
            reason: format!("status {}", status),
        })
    }
}

fn charset_of(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .filter_map(|part| part.trim().split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("charset"))
        .map(|(_, value)| value.trim().trim_matches('"').to_lowercase())
}

/// Decodes with the declared charset, UTF-8 when none is declared or the
/// label is unknown. Bytes invalid for that encoding are re-read as latin-1.
fn decode_body(url: &str, bytes: &[u8], charset: Option<&str>) -> String {
    let encoding = charset
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);

    match encoding.decode_without_bom_handling_and_without_replacement(bytes) {
        Some(text) => text.into_owned(),
        None => {
            tracing::warn!(
                "Encoding problems for {} ({}), decoding as latin-1",
                url,
                encoding.name()
            );
            // windows-1252 maps every byte, so this never fails.
            WINDOWS_1252.decode_without_bom_handling(bytes).0.into_owned()
        }
    }
}
