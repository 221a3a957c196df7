// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// There are no subcommands: the mode is picked with one of the mutually
// exclusive flags --crawl / --random / --featured / --search, and running
// with none of them uses the default mode (featured + random articles).
//
//   wiki-scraper                               default mode, 20 articles
//   wiki-scraper --crawl                       crawl, 25 articles, depth 2
//   wiki-scraper --random --max-articles 20    20 random articles
//
// Tunable values can also come from WIKI_SCRAPER_* environment variables.
// Validation and defaults that depend on the mode live in config.rs.
// =============================================================================

use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use crate::config::WriteMode;
use crate::fetch::DEFAULT_SITE;

#[derive(Parser, Debug)]
#[command(
    name = "wiki-scraper",
    version,
    about = "Collect Wikipedia articles into CSV or SQLite",
    long_about = "wiki-scraper collects Wikipedia articles (title, URL, summary, categories, \
                  lead image and outbound links) by crawling related articles, sampling random \
                  ones or reading the Main Page, and writes them to CSV and optionally SQLite."
)]
#[command(group(ArgGroup::new("mode").multiple(false)))]
pub struct Cli {
    /// Crawl related articles breadth-first from the seeds (or --url)
    #[arg(long, group = "mode")]
    pub crawl: bool,

    /// Collect random articles via Special:Random
    #[arg(long, group = "mode")]
    pub random: bool,

    /// Collect the entries shown on the Main Page
    #[arg(long, group = "mode")]
    pub featured: bool,

    /// Search for a term and crawl from the article it leads to
    #[arg(long, group = "mode", value_name = "TERM")]
    pub search: Option<String>,

    /// Article title or URL to start crawling from (repeatable)
    #[arg(long = "seed", value_name = "TITLE|URL")]
    pub seeds: Vec<String>,

    /// Start page for crawl and featured modes
    #[arg(long, env = "WIKI_SCRAPER_URL", default_value = "https://en.wikipedia.org/wiki/Main_Page")]
    pub url: String,

    /// Base URL of the wiki
    #[arg(long, env = "WIKI_SCRAPER_SITE", default_value = DEFAULT_SITE)]
    pub site: String,

    /// Maximum number of articles to collect (default: 20, or 25 outside default mode)
    #[arg(long, alias = "max_articles", env = "WIKI_SCRAPER_MAX_ARTICLES")]
    pub max_articles: Option<usize>,

    /// Maximum crawl depth in link hops from a seed
    #[arg(long, env = "WIKI_SCRAPER_DEPTH", default_value_t = 2)]
    pub depth: usize,

    /// How many outbound links of each crawled article are queued
    #[arg(long, env = "WIKI_SCRAPER_LINKS_PER_PAGE", default_value_t = 10)]
    pub links_per_page: usize,

    /// CSV output path (default: wikipedia_articles_<timestamp>.csv)
    #[arg(short, long, env = "WIKI_SCRAPER_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Also store the articles in a SQLite database
    #[arg(long)]
    pub db: bool,

    /// SQLite database path used with --db
    #[arg(long, env = "WIKI_SCRAPER_DB_PATH", default_value = "wikipedia_data.db")]
    pub db_path: PathBuf,

    /// What to do when an output already holds data
    #[arg(long, value_enum, env = "WIKI_SCRAPER_WRITE_MODE", default_value_t = WriteMode::Append)]
    pub write_mode: WriteMode,

    /// Pause between page requests, in milliseconds
    #[arg(long, env = "WIKI_SCRAPER_DELAY_MS", default_value_t = 500)]
    pub delay_ms: u64,

    /// Per-request timeout, in seconds
    #[arg(long, env = "WIKI_SCRAPER_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Print the collected articles as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Also write logs to this file
    #[arg(long, env = "WIKI_SCRAPER_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does `group = "mode"` do?
//    - All four mode flags belong to one ArgGroup with multiple(false), so
//      clap rejects `--crawl --random` with a usage error for us
//
// 2. Why is max_articles an Option?
//    - Its default depends on the mode (20 vs 25), which clap cannot know;
//      config.rs fills it in
//
// 3. What does `env = "..."` do?
//    - If the flag is not given, clap reads the environment variable instead,
//      and only then falls back to default_value
// -----------------------------------------------------------------------------
