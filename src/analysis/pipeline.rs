use std::sync::Arc;
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tokio::sync::Semaphore;

use crate::analysis::classifier::ArticleClassifier;
use crate::analysis::report::ReportAssembler;
use crate::config::CrawlerConfig;
use crate::models::{Candidate, Report, TaggedArticle};
use crate::sentiment::SentimentScorer;
use crate::taxonomy::MarketAreaConfig;
use crate::web::{extract_candidates, extract_text, PageSource};

#[derive(Debug, Clone, Serialize)]
pub struct SiteSummary {
    pub site: String,
    pub reachable: bool,
    pub candidates: usize,
    pub relevant: usize,
}

#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    pub report: Report,
    pub articles: Vec<TaggedArticle>,
    pub sites: Vec<SiteSummary>,
}

impl CrawlOutcome {
    pub fn has_articles(&self) -> bool {
        !self.articles.is_empty()
    }
}

pub struct CrawlPipeline {
    source: Arc<dyn PageSource>,
    scorer: Arc<dyn SentimentScorer>,
    classifier: ArticleClassifier,
    assembler: ReportAssembler,
    config: CrawlerConfig,
}

impl CrawlPipeline {
    pub fn new(
        source: impl PageSource + 'static,
        scorer: impl SentimentScorer + 'static,
        market_config: MarketAreaConfig,
        config: CrawlerConfig,
    ) -> Self {
        let market_config = Arc::new(market_config);
        let assembler = ReportAssembler::new(
            market_config.markets.tracked().to_vec(),
            market_config.locations.tracked().to_vec(),
        );

        Self {
            source: Arc::new(source),
            scorer: Arc::new(scorer),
            classifier: ArticleClassifier::new(market_config),
            assembler,
            config,
        }
    }

    /// Crawls every site and assembles the report. Unreachable sites
    /// contribute nothing; the run itself never fails.
    pub async fn run(&self, sites: &[String]) -> CrawlOutcome {
        tracing::info!(
            "Crawling {} sites with scorer '{}' (concurrency {})",
            sites.len(),
            self.scorer.name(),
            self.config.concurrency_limit
        );

        let semaphore = Arc::new(Semaphore::new(self.config.concurrency_limit.max(1)));

        let pb = ProgressBar::new(sites.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} sites")
                .map(|style| style.progress_chars("#>-"))
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let site_futures = sites.iter().map(|site| {
            let sem = semaphore.clone();
            let pb = pb.clone();
            async move {
                let result = self.analyze_site(site, &sem).await;
                pb.inc(1);
                result
            }
        });

        let results = join_all(site_futures).await;
        pb.finish_with_message("Crawl complete");

        let mut articles = Vec::new();
        let mut summaries = Vec::with_capacity(results.len());
        for (summary, site_articles) in results {
            tracing::info!(
                "Found {} relevant articles from {}",
                summary.relevant,
                summary.site
            );
            articles.extend(site_articles);
            summaries.push(summary);
        }

        if articles.is_empty() {
            tracing::warn!("No relevant articles found across {} sites", sites.len());
        }

        let report = self.assembler.assemble(&articles);

        CrawlOutcome {
            report,
            articles,
            sites: summaries,
        }
    }

    pub async fn analyze_site(
        &self,
        site: &str,
        semaphore: &Semaphore,
    ) -> (SiteSummary, Vec<TaggedArticle>) {
        tracing::info!("Analyzing site: {}", site);

        let mut summary = SiteSummary {
            site: site.to_string(),
            reachable: false,
            candidates: 0,
            relevant: 0,
        };

        let Some(html) = self.fetch_bounded(site, semaphore).await else {
            return (summary, Vec::new());
        };
        summary.reachable = true;

        let candidates =
            match extract_candidates(&html, site, self.config.max_articles_per_site) {
                Ok(candidates) => candidates,
                Err(e) => {
                    tracing::error!("Could not extract articles from {}: {}", site, e);
                    return (summary, Vec::new());
                }
            };
        summary.candidates = candidates.len();
        tracing::debug!("{} candidates on {}", candidates.len(), site);

        let article_futures = candidates
            .iter()
            .map(|candidate| self.analyze_candidate(candidate, semaphore));
        let articles: Vec<TaggedArticle> = join_all(article_futures)
            .await
            .into_iter()
            .flatten()
            .collect();

        summary.relevant = articles.len();
        (summary, articles)
    }

    async fn analyze_candidate(
        &self,
        candidate: &Candidate,
        semaphore: &Semaphore,
    ) -> Option<TaggedArticle> {
        let content = match self.fetch_bounded(&candidate.url, semaphore).await {
            Some(page) => extract_text(&page),
            None => candidate.preview.clone(),
        };

        let article = self
            .classifier
            .classify(candidate, &content, self.scorer.as_ref())?;

        let title: String = article.title.chars().take(50).collect();
        tracing::info!("Relevant article: {}...", title);
        Some(article)
    }

    async fn fetch_bounded(&self, url: &str, semaphore: &Semaphore) -> Option<String> {
        let _permit = semaphore.acquire().await.ok()?;
        self.source.fetch_page(url).await
    }
}
