use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use crate::error::Result;
use crate::models::{content_preview, ArticleSummary, Report, TaggedArticle};

/// Run history. Written after each run, never read back into aggregation.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let storage = Self { conn };
        storage.init_db()?;
        Ok(storage)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let storage = Self { conn };
        storage.init_db()?;
        Ok(storage)
    }

    fn init_db(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS runs (
                id INTEGER PRIMARY KEY,
                timestamp TEXT NOT NULL,
                total_articles INTEGER NOT NULL,
                report_json TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS articles (
                id INTEGER PRIMARY KEY,
                run_id INTEGER NOT NULL REFERENCES runs(id),
                title TEXT NOT NULL,
                url TEXT NOT NULL,
                markets_json TEXT NOT NULL,
                locations_json TEXT NOT NULL,
                sentiment_score REAL NOT NULL,
                content TEXT NOT NULL,
                discovered_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_articles_run_id ON articles(run_id);
            "#,
        )?;

        Ok(())
    }

    pub fn save_run(&mut self, report: &Report, articles: &[TaggedArticle]) -> Result<i64> {
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO runs (timestamp, total_articles, report_json) VALUES (?1, ?2, ?3)",
            params![
                report.timestamp.to_rfc3339(),
                report.total_articles as i64,
                serde_json::to_string(report)?,
            ],
        )?;
        let run_id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO articles
                    (run_id, title, url, markets_json, locations_json,
                     sentiment_score, content, discovered_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )?;

            for article in articles {
                stmt.execute(params![
                    run_id,
                    article.title,
                    article.url,
                    serde_json::to_string(&article.markets)?,
                    serde_json::to_string(&article.locations)?,
                    article.sentiment_score,
                    article.content,
                    article.discovered_at.to_rfc3339(),
                ])?;
            }
        }

        tx.commit()?;
        tracing::debug!("Stored run {} with {} articles", run_id, articles.len());
        Ok(run_id)
    }

    pub fn latest_report(&self) -> Result<Option<Report>> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT report_json FROM runs ORDER BY id DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;

        match json {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    pub fn run_articles(&self, run_id: i64) -> Result<Vec<ArticleSummary>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT title, url, markets_json, locations_json, sentiment_score, content
            FROM articles
            WHERE run_id = ?1
            ORDER BY id
            "#,
        )?;

        let rows = stmt.query_map(params![run_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, f64>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut summaries = Vec::new();
        for row in rows {
            let (title, url, markets_json, locations_json, sentiment_score, content) = row?;
            summaries.push(ArticleSummary {
                title,
                url,
                market_areas: serde_json::from_str(&markets_json)?,
                locations: serde_json::from_str(&locations_json)?,
                sentiment_score,
                content_preview: content_preview(&content),
            });
        }

        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ReportAssembler;
    use chrono::Utc;

    fn article(url: &str, score: f64) -> TaggedArticle {
        TaggedArticle {
            title: "Titolo".to_string(),
            content: "Contenuto".to_string(),
            url: url.to_string(),
            discovered_at: Utc::now(),
            markets: vec!["energia".to_string()],
            locations: vec!["europa".to_string(), "italia".to_string()],
            sentiment_score: score,
        }
    }

    fn assembler() -> ReportAssembler {
        ReportAssembler::new(
            vec!["energia".to_string()],
            vec!["europa".to_string(), "italia".to_string()],
        )
    }

    #[test]
    fn test_latest_report_empty() {
        let storage = Storage::in_memory().unwrap();
        assert!(storage.latest_report().unwrap().is_none());
    }

    #[test]
    fn test_save_and_load_runs() {
        let mut storage = Storage::in_memory().unwrap();

        let first = vec![article("https://a.example/1", 20.0)];
        storage
            .save_run(&assembler().assemble(&first), &first)
            .unwrap();

        let second = vec![
            article("https://a.example/2", 70.0),
            article("https://a.example/3", 80.0),
        ];
        let run_id = storage
            .save_run(&assembler().assemble(&second), &second)
            .unwrap();

        let latest = storage.latest_report().unwrap().unwrap();
        assert_eq!(latest.total_articles, 2);
        assert_eq!(latest.markets["energia"].average_sentiment, 75.0);
        assert_eq!(latest.matrix["energia_italia"].stats.article_count, 2);

        let stored = storage.run_articles(run_id).unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].url, "https://a.example/2");
        assert_eq!(stored[1].locations, vec!["europa".to_string(), "italia".to_string()]);
    }

    #[test]
    fn test_run_articles_match_written_summaries() {
        let mut storage = Storage::in_memory().unwrap();
        let mut long = article("https://a.example/long", 64.25);
        long.content = "è".repeat(300);
        let articles = vec![long, article("https://a.example/short", 31.0)];

        let run_id = storage
            .save_run(&assembler().assemble(&articles), &articles)
            .unwrap();

        let expected: Vec<ArticleSummary> = articles.iter().map(ArticleSummary::from).collect();
        assert_eq!(storage.run_articles(run_id).unwrap(), expected);
        assert!(expected[0].content_preview.ends_with("..."));
    }
}
