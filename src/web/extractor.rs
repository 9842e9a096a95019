use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

use crate::error::Result;
use crate::models::{truncate_chars, Candidate, MAX_PREVIEW_CHARS};

pub const DEFAULT_MAX_CANDIDATES: usize = 20;

/// Listing-page selectors, scanned in order.
const ARTICLE_SELECTORS: &[&str] = &[
    "article",
    ".article",
    ".news-item",
    ".post",
    "h2 a",
    "h3 a",
    ".title a",
];

const TITLE_SELECTOR: &str = "h1, h2, h3, a";

const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript"];

fn parse_selector(raw: &str) -> Option<Selector> {
    match Selector::parse(raw) {
        Ok(selector) => Some(selector),
        Err(e) => {
            tracing::debug!("Invalid selector {}: {:?}", raw, e);
            None
        }
    }
}

/// Pulls candidate articles out of a listing page.
///
/// Links are resolved against `base_url`; elements without a usable title
/// or link are skipped, and repeated URLs keep their first occurrence.
pub fn extract_candidates(html: &str, base_url: &str, limit: usize) -> Result<Vec<Candidate>> {
    let base = Url::parse(base_url)?;
    let document = Html::parse_document(html);
    let title_selector = parse_selector(TITLE_SELECTOR);

    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for selector in ARTICLE_SELECTORS.iter().filter_map(|raw| parse_selector(raw)) {
        for element in document.select(&selector) {
            if candidates.len() >= limit {
                return Ok(candidates);
            }

            let Some((title, link)) = title_and_link(element, title_selector.as_ref()) else {
                continue;
            };

            let url = match resolve_link(&base, &link) {
                Some(url) => url,
                None => {
                    tracing::debug!("Skipping unusable link: {}", link);
                    continue;
                }
            };

            if !seen.insert(url.clone()) {
                continue;
            }

            let text = element_text(element);
            candidates.push(Candidate {
                title,
                url,
                preview: truncate_chars(&text, MAX_PREVIEW_CHARS).to_string(),
            });
        }
    }

    Ok(candidates)
}

fn title_and_link(element: ElementRef<'_>, title_selector: Option<&Selector>) -> Option<(String, String)> {
    let (title, link) = if element.value().name() == "a" {
        (element_text(element), element.value().attr("href"))
    } else {
        let title_elem = element.select(title_selector?).next()?;
        let link = if title_elem.value().name() == "a" {
            title_elem.value().attr("href")
        } else {
            None
        };
        (element_text(title_elem), link)
    };

    let link = link?.trim();
    if title.is_empty() || link.is_empty() {
        return None;
    }
    Some((title, link.to_string()))
}

fn resolve_link(base: &Url, link: &str) -> Option<String> {
    let url = base.join(link).ok()?;
    match url.scheme() {
        "http" | "https" => Some(url.to_string()),
        _ => None,
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Visible text of a whole page with `script`/`style` contents dropped and
/// whitespace collapsed to single spaces. Adjacent text nodes are joined
/// as-is, so inline markup never splits a word.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut raw = String::new();

    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map(|e| SKIPPED_TAGS.contains(&e.name()))
                .unwrap_or(false)
        });
        if hidden {
            continue;
        }

        raw.push_str(text);
    }

    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
