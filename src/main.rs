// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging and validate the configuration
// 3. Run the crawl (Ctrl-C stops it early)
// 4. Print the crawl report
// 5. Exit with proper code (0 = crawl finished, 1 = crawl cancelled, 2 = error)
// =============================================================================

mod cli;
mod config;
mod crawl;
mod error;
mod fetch;
mod logging;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{error::ErrorKind, CommandFactory, Parser};
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use cli::Cli;
use config::CrawlConfig;
use crawl::{CrawlReport, Crawler, PageRecord};
use fetch::{HtmlLinkExtractor, HttpFetcher};

#[tokio::main]
async fn main() {
    // A missing --url prints usage and exits non-zero right here.
    let cli = Cli::parse();

    logging::init_logging(cli.verbose);

    // Bad values get the same usage-style message as clap's own errors, and
    // nothing has been spawned yet.
    let config = match CrawlConfig::try_from(&cli) {
        Ok(config) => config,
        Err(e) => Cli::command().error(ErrorKind::ValueValidation, e).exit(),
    };

    let exit_code = match run(config, cli.json).await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = the frontier was exhausted
//   Ok(1) = the crawl was cancelled before that
//   Err   = unexpected error
async fn run(config: CrawlConfig, json: bool) -> Result<i32> {
    let fetcher = HttpFetcher::new(config.fetch_timeout).context("failed to build HTTP client")?;
    let crawler = Crawler::new(config, Arc::new(fetcher), Arc::new(HtmlLinkExtractor::new()));

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, stopping crawl");
            on_interrupt.cancel();
        }
    });

    let report = crawler.run(cancel).await;

    print_report(&report, json)?;

    Ok(if report.cancelled { 1 } else { 0 })
}

fn print_report(report: &CrawlReport, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(report)?;
        println!("{}", json_output);
    } else {
        print_table(report);
    }
    Ok(())
}

// Prints the visited pages as a human-readable table
fn print_table(report: &CrawlReport) {
    println!("{:<6} {:<60} {:<40}", "DEPTH", "URL", "FOUND ON");
    println!("{}", "=".repeat(106));

    for page in &report.pages {
        println!(
            "{:<6} {:<60} {:<40}",
            page.depth,
            truncate(&page.url, 57),
            truncate(found_on(page), 37)
        );
    }

    println!();

    println!("📊 Summary:");
    println!("   🌱 Seed: {}", report.seed);
    println!("   📏 Max depth: {}", report.max_depth);
    println!("   📄 Scheduled: {}", report.pages.len());
    println!("   ✅ Fetched: {}", report.fetched);
    println!("   ❌ Dropped: {}", report.dropped);
    println!("   🔗 Links seen: {}", report.links_seen);
    if report.cancelled {
        println!("   ⏹️  Crawl was cancelled before finishing");
    }
}

fn found_on(page: &PageRecord) -> &str {
    page.found_on.as_deref().unwrap_or("(seed)")
}

// Shortens long values for display, respecting char boundaries
fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() > max_chars {
        let head: String = value.chars().take(max_chars).collect();
        format!("{}...", head)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_value() {
        assert_eq!(truncate("https://a.b", 57), "https://a.b");
    }

    #[test]
    fn test_truncate_long_value() {
        let long = "x".repeat(70);
        assert_eq!(truncate(&long, 10), format!("{}...", "x".repeat(10)));
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("ééééé", 2), "éé...");
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = CrawlReport {
            seed: "https://example.com".to_string(),
            max_depth: 1,
            workers: 2,
            pages: vec![
                PageRecord {
                    url: "https://example.com".to_string(),
                    depth: 0,
                    found_on: None,
                },
                PageRecord {
                    url: "https://example.com/a".to_string(),
                    depth: 1,
                    found_on: Some("https://example.com".to_string()),
                },
            ],
            fetched: 2,
            dropped: 0,
            links_seen: 3,
            cancelled: false,
        };

        let value: serde_json::Value = serde_json::from_str(&serde_json::to_string(&report).unwrap()).unwrap();
        assert_eq!(value["pages"][0].get("found_on"), None);
        assert_eq!(value["pages"][1]["found_on"], "https://example.com");
        assert_eq!(value["pages"][1]["depth"], 1);
        assert_eq!(value["cancelled"], false);
    }
}
