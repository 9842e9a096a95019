use clap::Parser;
use tracing_subscriber::EnvFilter;

use marketcrawler::models::{Report, Trend};
use marketcrawler::storage::write_run_files;
use marketcrawler::{
    Config, CrawlPipeline, CrawlerConfig, HttpFetcher, MarketAreaConfig, Storage, VaderScorer,
    DEFAULT_SITES,
};

#[derive(Parser, Debug)]
#[command(name = "marketcrawler")]
#[command(version = "0.1.0")]
#[command(about = "Crawl news sites and report market sentiment by location")]
struct Args {
    /// Sites to crawl (defaults to the built-in Italian news sites)
    #[arg(long, value_delimiter = ',')]
    sites: Vec<String>,

    /// Markets to track (defaults to every market in the vocabulary)
    #[arg(long, value_delimiter = ',')]
    markets: Vec<String>,

    /// Locations to track (defaults to every location in the vocabulary)
    #[arg(long, value_delimiter = ',')]
    locations: Vec<String>,

    /// JSON file with custom market and location keywords
    #[arg(long)]
    vocabulary: Option<String>,

    /// Output format (json, text, markdown)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Directory for the report and article files
    #[arg(short, long)]
    output_dir: Option<String>,

    /// SQLite database for run history
    #[arg(long)]
    database: Option<String>,

    /// Print the latest stored report and exit
    #[arg(long)]
    latest: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("marketcrawler=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = Config::from_env()?;

    let database = args.database.clone().or_else(|| config.database_path.clone());

    if args.latest {
        let Some(path) = database else {
            anyhow::bail!("--latest needs --database or CRAWLER_DATABASE_PATH");
        };
        let storage = Storage::new(&path)?;
        match storage.latest_report()? {
            Some(report) => println!("{}", render(&report, &args.format)?),
            None => println!("No stored runs in {}", path),
        }
        return Ok(());
    }

    let market_config = match args.vocabulary {
        Some(ref path) => MarketAreaConfig::from_json_file(path)?,
        None => MarketAreaConfig::default(),
    }
    .with_tracked(&args.markets, &args.locations)?;

    let sites: Vec<String> = if args.sites.is_empty() {
        DEFAULT_SITES.iter().map(|s| s.to_string()).collect()
    } else {
        args.sites.clone()
    };

    println!("=== MARKET AREA CRAWLER - SENTIMENT ANALYSIS ===");
    println!("Markets: {}", market_config.markets.tracked().join(", "));
    println!("Locations: {}", market_config.locations.tracked().join(", "));
    println!("Sites: {}", sites.len());

    let fetcher = HttpFetcher::new(config.request_timeout_secs)?;
    let pipeline = CrawlPipeline::new(
        fetcher,
        VaderScorer::new(),
        market_config,
        CrawlerConfig::from(&config),
    );

    let outcome = pipeline.run(&sites).await;

    for site in &outcome.sites {
        println!(
            "  {} -> {} relevant of {} candidates{}",
            site.site,
            site.relevant,
            site.candidates,
            if site.reachable { "" } else { " (unreachable)" }
        );
    }

    if !outcome.has_articles() {
        println!("\nNo relevant articles found.");
        println!("  - Check the market and location keywords");
        println!("  - Check the network connection");
        println!("  - Some sites may block the crawler");
        return Ok(());
    }

    let output_dir = args.output_dir.clone().unwrap_or(config.output_dir.clone());
    let files = write_run_files(&output_dir, &outcome.report, &outcome.articles)?;

    if let Some(ref path) = database {
        let mut storage = Storage::new(path)?;
        let run_id = storage.save_run(&outcome.report, &outcome.articles)?;
        tracing::info!("Run {} saved to {}", run_id, path);
    }

    println!("{}", render(&outcome.report, &args.format)?);
    println!("\nFiles written:");
    println!("  Report: {}", files.report.display());
    println!("  Articles: {}", files.articles.display());

    Ok(())
}

fn render(report: &Report, format: &str) -> anyhow::Result<String> {
    Ok(match format {
        "json" => serde_json::to_string_pretty(report)?,
        "markdown" => format_markdown(report),
        _ => format_text(report),
    })
}

fn trend_indicator(trend: Trend) -> &'static str {
    match trend {
        Trend::Positive => "↑",
        Trend::Negative => "↓",
        Trend::Neutral => "→",
    }
}

fn format_text(report: &Report) -> String {
    let mut output = String::new();

    output.push_str(&format!("\n{}\n", "=".repeat(60)));
    output.push_str("SENTIMENT SUMMARY\n");
    output.push_str(&format!("{}\n", "=".repeat(60)));
    output.push_str(&format!("Timestamp: {}\n", report.timestamp.to_rfc3339()));
    output.push_str(&format!("Total articles: {}\n", report.total_articles));

    if !report.markets.is_empty() {
        output.push_str("\nSentiment by market:\n");
        for (market, stats) in &report.markets {
            output.push_str(&format!(
                "  {} {}: {:.1}/100 ({} articles)\n",
                trend_indicator(stats.sentiment_trend),
                market.to_uppercase(),
                stats.average_sentiment,
                stats.article_count
            ));
        }
    }

    if !report.locations.is_empty() {
        output.push_str("\nSentiment by location:\n");
        for (location, stats) in &report.locations {
            output.push_str(&format!(
                "  {} {}: {:.1}/100 ({} articles)\n",
                trend_indicator(stats.sentiment_trend),
                location.to_uppercase(),
                stats.average_sentiment,
                stats.article_count
            ));
        }
    }

    let top = report.top_pairs(5);
    if !top.is_empty() {
        output.push_str("\nTop market-location pairs:\n");
        for (i, entry) in top.iter().enumerate() {
            output.push_str(&format!(
                "  {}. {} {} in {}: {:.1}/100\n",
                i + 1,
                trend_indicator(entry.stats.sentiment_trend),
                entry.market.to_uppercase(),
                entry.location.to_uppercase(),
                entry.stats.average_sentiment
            ));
        }
    }

    output
}

fn format_markdown(report: &Report) -> String {
    let mut output = String::new();

    output.push_str("# Market Sentiment Report\n\n");
    output.push_str(&format!(
        "*Generated {}* | **{}** articles\n",
        report.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
        report.total_articles
    ));

    output.push_str("\n## Markets\n\n");
    output.push_str("| Market | Articles | Sentiment | Trend |\n");
    output.push_str("|--------|----------|-----------|-------|\n");
    for (market, stats) in &report.markets {
        output.push_str(&format!(
            "| {} | {} | {:.2} | {} |\n",
            market, stats.article_count, stats.average_sentiment, stats.sentiment_trend
        ));
    }

    output.push_str("\n## Locations\n\n");
    output.push_str("| Location | Articles | Sentiment | Trend |\n");
    output.push_str("|----------|----------|-----------|-------|\n");
    for (location, stats) in &report.locations {
        output.push_str(&format!(
            "| {} | {} | {:.2} | {} |\n",
            location, stats.article_count, stats.average_sentiment, stats.sentiment_trend
        ));
    }

    output.push_str("\n## Market × Location\n\n");
    output.push_str("| Market | Location | Articles | Sentiment | Trend |\n");
    output.push_str("|--------|----------|----------|-----------|-------|\n");
    for entry in report.matrix.values() {
        output.push_str(&format!(
            "| {} | {} | {} | {:.2} | {} |\n",
            entry.market,
            entry.location,
            entry.stats.article_count,
            entry.stats.average_sentiment,
            entry.stats.sentiment_trend
        ));
    }

    output
}
