pub mod tagger;

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};

pub use tagger::find_categories;

/// Keyword lists for one dimension (markets or locations) plus the subset
/// of ids the current run tracks.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    kind: &'static str,
    known: Vec<String>,
    tracked: Vec<String>,
    keywords: HashMap<String, Vec<String>>,
}

impl Vocabulary {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    /// Adds a category from user-supplied data. Ids are lowercased and may
    /// not contain `_`, which separates market and location in matrix keys.
    pub fn add_category(&mut self, id: &str, keywords: &[&str]) -> Result<()> {
        let id = id.trim().to_lowercase();
        if id.is_empty() || id.contains('_') {
            return Err(Error::Config(format!(
                "invalid {} id '{}': must be non-empty and must not contain '_'",
                self.kind, id
            )));
        }
        if self.keywords.contains_key(&id) {
            return Err(Error::Config(format!("duplicate {} id: {}", self.kind, id)));
        }

        let keywords: Vec<String> = keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        if keywords.is_empty() {
            return Err(Error::Config(format!(
                "{} '{}' has no keywords",
                self.kind, id
            )));
        }

        self.insert(id, keywords);
        Ok(())
    }

    fn insert(&mut self, id: String, keywords: Vec<String>) {
        self.known.push(id.clone());
        self.tracked.push(id.clone());
        self.keywords.insert(id, keywords);
    }

    /// Restricts the tracked list, keeping the caller's order.
    pub fn track(&mut self, ids: &[String]) -> Result<()> {
        let mut tracked = Vec::with_capacity(ids.len());
        for id in ids {
            let id = id.trim().to_lowercase();
            if !self.keywords.contains_key(&id) {
                return Err(Error::UnknownCategory {
                    kind: self.kind,
                    id,
                });
            }
            if !tracked.contains(&id) {
                tracked.push(id);
            }
        }
        self.tracked = tracked;
        Ok(())
    }

    pub fn known(&self) -> &[String] {
        &self.known
    }

    pub fn tracked(&self) -> &[String] {
        &self.tracked
    }

    pub fn keywords(&self, id: &str) -> &[String] {
        self.keywords.get(id).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[derive(Debug, Deserialize)]
struct VocabularyFile {
    markets: Vec<CategoryEntry>,
    locations: Vec<CategoryEntry>,
}

#[derive(Debug, Deserialize)]
struct CategoryEntry {
    id: String,
    keywords: Vec<String>,
}

/// Static run configuration: tracked markets and locations with their
/// keyword lists. Built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct MarketAreaConfig {
    pub markets: Vocabulary,
    pub locations: Vocabulary,
}

impl MarketAreaConfig {
    pub fn new() -> Self {
        let mut config = Self {
            markets: Vocabulary::new("market"),
            locations: Vocabulary::new("location"),
        };

        config.init_markets();
        config.init_locations();

        config
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let file: VocabularyFile = serde_json::from_str(&raw)?;

        let mut config = Self {
            markets: Vocabulary::new("market"),
            locations: Vocabulary::new("location"),
        };

        for entry in &file.markets {
            let keywords: Vec<&str> = entry.keywords.iter().map(String::as_str).collect();
            config.markets.add_category(&entry.id, &keywords)?;
        }
        for entry in &file.locations {
            let keywords: Vec<&str> = entry.keywords.iter().map(String::as_str).collect();
            config.locations.add_category(&entry.id, &keywords)?;
        }

        tracing::info!(
            "Loaded vocabulary from {}: {} markets, {} locations",
            path.as_ref().display(),
            config.markets.known().len(),
            config.locations.known().len()
        );

        Ok(config)
    }

    /// Narrows the tracked lists. An empty slice leaves that dimension as is.
    pub fn with_tracked(mut self, markets: &[String], locations: &[String]) -> Result<Self> {
        if !markets.is_empty() {
            self.markets.track(markets)?;
        }
        if !locations.is_empty() {
            self.locations.track(locations)?;
        }
        Ok(self)
    }

    fn init_markets(&mut self) {
        let markets: [(&str, &[&str]); 7] = [
            (
                "tecnologia",
                &[
                    "tech", "tecnologia", "software", "ai", "intelligenza artificiale",
                    "startup", "digitale", "internet", "cloud", "blockchain", "crypto",
                ],
            ),
            (
                "finanza",
                &[
                    "finanza", "banking", "banche", "investimenti", "mercati finanziari",
                    "borsa", "trading", "azioni", "obbligazioni", "fondi",
                ],
            ),
            (
                "energia",
                &[
                    "energia", "petrolio", "gas", "rinnovabili", "solare", "eolico",
                    "nucleare", "carbone", "elettricità", "idrogeno",
                ],
            ),
            (
                "automotive",
                &[
                    "auto", "automotive", "veicoli", "trasporti", "mobilità",
                    "elettriche", "guida autonoma", "tesla", "volkswagen",
                ],
            ),
            (
                "immobiliare",
                &[
                    "immobiliare", "real estate", "case", "proprietà", "edilizia",
                    "costruzioni", "affitti", "mutui", "residential",
                ],
            ),
            (
                "salute",
                &[
                    "salute", "sanità", "farmaceutico", "medicina", "ospedale",
                    "covid", "vaccini", "biotech", "healthcare",
                ],
            ),
            (
                "turismo",
                &[
                    "turismo", "viaggi", "hotel", "airline", "crociere",
                    "vacanze", "hospitality", "booking",
                ],
            ),
        ];

        for (id, keywords) in markets {
            self.markets.insert(id.to_string(), owned_keywords(keywords));
        }
    }

    fn init_locations(&mut self) {
        let locations: [(&str, &[&str]); 8] = [
            (
                "italia",
                &[
                    "italia", "italy", "romano", "milano", "napoli", "torino",
                    "florence", "venice", "italian", "italiano",
                ],
            ),
            (
                "europa",
                &[
                    "europa", "europe", "ue", "european union", "bruxelles",
                    "eurozona", "bce", "european",
                ],
            ),
            (
                "usa",
                &[
                    "usa", "america", "stati uniti", "washington", "new york",
                    "california", "texas", "american", "americano",
                ],
            ),
            (
                "cina",
                &[
                    "cina", "china", "beijing", "shanghai", "hong kong",
                    "chinese", "cinese", "pechino",
                ],
            ),
            (
                "giappone",
                &[
                    "giappone", "japan", "tokyo", "osaka", "japanese",
                    "giapponese", "nikkei",
                ],
            ),
            (
                "germania",
                &[
                    "germania", "germany", "berlino", "monaco", "frankfurt",
                    "german", "tedesco", "dax",
                ],
            ),
            (
                "francia",
                &[
                    "francia", "france", "parigi", "paris", "french",
                    "francese", "cac40",
                ],
            ),
            (
                "regno unito",
                &[
                    "regno unito", "uk", "britain", "london", "londra",
                    "british", "britannico", "ftse",
                ],
            ),
        ];

        for (id, keywords) in locations {
            self.locations.insert(id.to_string(), owned_keywords(keywords));
        }
    }
}

fn owned_keywords(keywords: &[&str]) -> Vec<String> {
    keywords.iter().map(|k| k.to_string()).collect()
}

impl Default for MarketAreaConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_vocabulary_tracks_everything() {
        let config = MarketAreaConfig::default();
        assert_eq!(config.markets.tracked().len(), 7);
        assert_eq!(config.locations.tracked().len(), 8);
        assert_eq!(config.markets.tracked()[0], "tecnologia");
        assert!(config.locations.keywords("regno unito").contains(&"ftse".to_string()));
    }

    #[test]
    fn test_with_tracked_restricts_and_lowercases() {
        let config = MarketAreaConfig::default()
            .with_tracked(
                &["Finanza".to_string(), "tecnologia".to_string()],
                &["USA".to_string()],
            )
            .unwrap();
        assert_eq!(config.markets.tracked(), ["finanza", "tecnologia"]);
        assert_eq!(config.locations.tracked(), ["usa"]);
        assert_eq!(config.markets.known().len(), 7);
    }

    #[test]
    fn test_with_tracked_rejects_unknown_id() {
        let err = MarketAreaConfig::default()
            .with_tracked(&["agricoltura".to_string()], &[])
            .unwrap_err();
        assert!(matches!(err, Error::UnknownCategory { kind: "market", .. }));
    }

    #[test]
    fn test_from_json_file() {
        let path = std::env::temp_dir().join(format!(
            "marketcrawler-vocab-{}.json",
            std::process::id()
        ));
        std::fs::write(
            &path,
            r#"{
                "markets": [{"id": "Tech", "keywords": ["Software", "cloud"]}],
                "locations": [
                    {"id": "italia", "keywords": ["milano"]},
                    {"id": "usa", "keywords": ["new york"]}
                ]
            }"#,
        )
        .unwrap();

        let config = MarketAreaConfig::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.markets.tracked(), ["tech"]);
        assert_eq!(config.markets.keywords("tech"), ["software", "cloud"]);
        assert_eq!(config.locations.tracked(), ["italia", "usa"]);
    }

    #[test]
    fn test_duplicate_id_is_config_error() {
        let mut vocabulary = Vocabulary::new("market");
        vocabulary.add_category("tech", &["software"]).unwrap();
        let err = vocabulary.add_category("TECH", &["cloud"]).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_underscore_id_is_config_error() {
        let mut vocabulary = Vocabulary::new("location");
        let err = vocabulary.add_category("nord_italia", &["milano"]).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(vocabulary.known().is_empty());

        assert!(vocabulary.add_category("  ", &["milano"]).is_err());
        assert!(vocabulary.add_category("nord italia", &["milano"]).is_ok());
    }

    #[test]
    fn test_builtin_vocabulary_passes_validation() {
        let builtin = MarketAreaConfig::default();
        for source in [&builtin.markets, &builtin.locations] {
            let mut checked = Vocabulary::new("check");
            for id in source.known() {
                let keywords: Vec<&str> = source.keywords(id).iter().map(String::as_str).collect();
                checked.add_category(id, &keywords).unwrap();
                assert_eq!(checked.keywords(id), source.keywords(id));
            }
            assert_eq!(checked.known(), source.known());
        }
    }
}
