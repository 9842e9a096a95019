use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::{ArticleSummary, Report, TaggedArticle};

#[derive(Debug, Clone)]
pub struct RunFiles {
    pub report: PathBuf,
    pub articles: PathBuf,
}

/// Writes `market_sentiment_<ts>.json` and `articles_<ts>.json` into `dir`,
/// stamped with the report's own timestamp.
pub fn write_run_files<P: AsRef<Path>>(
    dir: P,
    report: &Report,
    articles: &[TaggedArticle],
) -> Result<RunFiles> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let stamp = report.timestamp.format("%Y%m%d_%H%M%S");
    let report_path = dir.join(format!("market_sentiment_{}.json", stamp));
    let articles_path = dir.join(format!("articles_{}.json", stamp));

    fs::write(&report_path, serde_json::to_string_pretty(report)?)?;

    let summaries: Vec<ArticleSummary> = articles.iter().map(ArticleSummary::from).collect();
    fs::write(&articles_path, serde_json::to_string_pretty(&summaries)?)?;

    tracing::info!(
        "Wrote {} and {}",
        report_path.display(),
        articles_path.display()
    );

    Ok(RunFiles {
        report: report_path,
        articles: articles_path,
    })
}
