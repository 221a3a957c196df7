// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap, set up logging
// 2. Validate them into a ScrapeConfig
// 3. Collect articles with one HTTP session (closed before anything is written)
// 4. Write them to CSV (and SQLite with --db), print a summary
// 5. Exit with proper code (0 = articles saved, 1 = nothing collected, 2 = error)
//
// Rust concepts used:
// - async/await: fetching pages is network I/O, driven by a single-threaded tokio runtime
// - anyhow::Context: wraps the typed errors of the library with a readable "what failed"
// - Box<dyn ArticleSink>: CSV and SQLite outputs handled through one trait
// =============================================================================

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{error, info, warn};

use wiki_scraper::cli::Cli;
use wiki_scraper::config::{ScrapeConfig, WriteMode};
use wiki_scraper::crawl::{self, Harvest, HarvestStats};
use wiki_scraper::fetch::HttpFetcher;
use wiki_scraper::sink;
use wiki_scraper::{logging, Article};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.log_file.as_deref()) {
        eprintln!("Error: could not open log file: {}", e);
        std::process::exit(2);
    }

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// This is the main application logic
// Returns:
//   Ok(0) = articles collected and saved
//   Ok(1) = nothing collected, nothing written
//   Err   = bad arguments or an output could not be written (exit code 2)
async fn run(cli: Cli) -> Result<i32> {
    let config = ScrapeConfig::from_cli(&cli).context("invalid arguments")?;

    // The fetcher is our browser session: it lives only for this block, so it
    // is released on every path out of the collection phase
    let harvest = {
        let fetcher = HttpFetcher::new(config.site.clone(), config.timeout)
            .context("could not create the HTTP client")?;
        crawl::harvest(&fetcher, &config).await
    };

    if harvest.articles.is_empty() {
        warn!("no articles collected, nothing to save");
        print_summary(&harvest.stats, &[]);
        return Ok(1);
    }

    let mut saved = Vec::new();
    for mut output in sink::open_sinks(&config.output).context("could not open outputs")? {
        let written = output
            .write(&harvest.articles)
            .with_context(|| format!("could not write {}", output.describe()))?;
        info!(destination = %output.describe(), written, "saved articles");
        saved.push((output.describe(), written));
    }

    print_results(&harvest, &saved, config.output.write_mode, config.json)?;
    Ok(0)
}

#[derive(Serialize)]
struct Report<'a> {
    stats: &'a HarvestStats,
    write_mode: WriteMode,
    outputs: Vec<Output<'a>>,
    articles: &'a [Article],
}

#[derive(Serialize)]
struct Output<'a> {
    destination: &'a str,
    rows_written: usize,
}

// Prints the results either as a table or JSON
// Parameters:
//   harvest: everything collected, with the run's counters
//   saved: (destination, rows written) for every output
//   write_mode: how existing output data was treated, echoed in the JSON report
//   json: whether to output JSON format
fn print_results(
    harvest: &Harvest,
    saved: &[(String, usize)],
    write_mode: WriteMode,
    json: bool,
) -> Result<()> {
    if json {
        let report = Report {
            stats: &harvest.stats,
            write_mode,
            outputs: saved
                .iter()
                .map(|(destination, rows_written)| Output {
                    destination,
                    rows_written: *rows_written,
                })
                .collect(),
            articles: &harvest.articles,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_table(&harvest.articles);
        print_summary(&harvest.stats, saved);
    }
    Ok(())
}

// Prints collected articles as a human-readable table in the terminal
fn print_table(articles: &[Article]) {
    println!("{:<45} {:>6} {:<60}", "TITLE", "LINKS", "URL");
    println!("{}", "=".repeat(113));

    for article in articles {
        println!(
            "{:<45} {:>6} {:<60}",
            truncate(&article.title, 45),
            article.links.len(),
            truncate(&article.url, 60)
        );
    }

    println!();
}

fn print_summary(stats: &HarvestStats, saved: &[(String, usize)]) {
    println!("📊 Summary:");
    println!("   ✅ Collected: {}", stats.collected);
    println!("   ❌ Failed: {}", stats.failed);
    println!("   🔁 Duplicates skipped: {}", stats.duplicates);
    println!("   📋 Pages requested: {}", stats.attempted);
    for (destination, written) in saved {
        println!("   💾 {}: {} row(s)", destination, written);
    }
}

// Cuts a string to `width` characters, marking the cut with "..."
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let kept: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        text.to_string()
    }
}
