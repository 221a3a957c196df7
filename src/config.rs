// src/config.rs
// =============================================================================
// Turns the parsed command line into a validated run configuration.
//
// Cli (cli.rs) is exactly what the user typed. ScrapeConfig is what the rest
// of the program works with: a Mode, typed targets, limits, durations and
// resolved output paths. Anything that can be wrong with the flags is
// reported here as a ConfigError before any page is fetched.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Local};
use clap::ValueEnum;
use serde::Serialize;

use crate::cli::Cli;
use crate::crawl::CrawlLimits;
use crate::error::ConfigError;
use crate::fetch::{Site, Target};

/// Articles collected in default mode unless --max-articles says otherwise
pub const DEFAULT_MODE_ARTICLES: usize = 20;
/// Articles collected in every other mode
pub const DEFAULT_MAX_ARTICLES: usize = 25;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Main Page entries, topped up with random articles
    Default,
    Featured,
    Crawl,
    Random,
    /// Crawl starting from whatever the search term resolves to
    Search(String),
}

impl Mode {
    fn from_cli(cli: &Cli) -> Mode {
        if let Some(term) = &cli.search {
            Mode::Search(term.clone())
        } else if cli.crawl {
            Mode::Crawl
        } else if cli.random {
            Mode::Random
        } else if cli.featured {
            Mode::Featured
        } else {
            Mode::Default
        }
    }

    pub fn default_articles(&self) -> usize {
        match self {
            Mode::Default => DEFAULT_MODE_ARTICLES,
            _ => DEFAULT_MAX_ARTICLES,
        }
    }
}

/// What to do with data already present in an output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// Add rows after the existing ones
    Append,
    /// Replace everything in the output
    Overwrite,
    /// Add only articles whose title is not stored yet
    #[value(name = "dedupe")]
    Deduplicate,
}

#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub csv_path: PathBuf,
    pub sqlite_path: Option<PathBuf>,
    pub write_mode: WriteMode,
}

#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub mode: Mode,
    pub site: Site,
    /// Start page for crawl and featured modes
    pub start: Target,
    pub seeds: Vec<Target>,
    pub limits: CrawlLimits,
    pub delay: Duration,
    pub timeout: Duration,
    pub output: OutputConfig,
    pub json: bool,
}

impl ScrapeConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        Self::from_cli_at(cli, Local::now())
    }

    // `now` only feeds the default CSV file name
    pub fn from_cli_at(cli: &Cli, now: DateTime<Local>) -> Result<Self, ConfigError> {
        let site = Site::new(&cli.site)?;

        if cli.links_per_page == 0 {
            return Err(ConfigError::NoLinksPerPage);
        }
        if cli.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        let mode = Mode::from_cli(cli);
        let max_articles = cli.max_articles.unwrap_or_else(|| mode.default_articles());

        let csv_path = cli
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(default_csv_name(now)));

        Ok(ScrapeConfig {
            start: Target::parse(&cli.url),
            seeds: cli.seeds.iter().map(|s| Target::parse(s)).collect(),
            limits: CrawlLimits {
                max_articles,
                max_depth: cli.depth,
                links_per_page: cli.links_per_page,
            },
            delay: Duration::from_millis(cli.delay_ms),
            timeout: Duration::from_secs(cli.timeout_secs),
            output: OutputConfig {
                csv_path,
                sqlite_path: cli.db.then(|| cli.db_path.clone()),
                write_mode: cli.write_mode,
            },
            json: cli.json,
            mode,
            site,
        })
    }

    // Where a crawl starts: the search result, explicit seeds, or --url
    pub fn crawl_seeds(&self) -> Vec<Target> {
        match &self.mode {
            Mode::Search(term) => vec![Target::Search(term.clone())],
            _ if !self.seeds.is_empty() => self.seeds.clone(),
            _ => vec![self.start.clone()],
        }
    }
}

/// wikipedia_articles_<YYYYmmdd_HHMMSS>.csv
pub fn default_csv_name(now: DateTime<Local>) -> String {
    format!("wikipedia_articles_{}.csv", now.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use clap::Parser;

    fn config(args: &[&str]) -> Result<ScrapeConfig, ConfigError> {
        let mut argv = vec!["wiki-scraper"];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).unwrap();
        let now = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        ScrapeConfig::from_cli_at(&cli, now)
    }

    #[test]
    fn test_default_mode_collects_twenty() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.mode, Mode::Default);
        assert_eq!(cfg.limits.max_articles, 20);
        assert_eq!(cfg.output.csv_path, PathBuf::from("wikipedia_articles_20240309_140507.csv"));
        assert_eq!(cfg.output.sqlite_path, None);
    }

    #[test]
    fn test_crawl_mode_defaults() {
        let cfg = config(&["--crawl"]).unwrap();
        assert_eq!(cfg.mode, Mode::Crawl);
        assert_eq!(cfg.limits.max_articles, 25);
        assert_eq!(cfg.limits.max_depth, 2);
        assert_eq!(cfg.crawl_seeds(), vec![Target::Url("https://en.wikipedia.org/wiki/Main_Page".into())]);
    }

    #[test]
    fn test_random_mode_respects_max_articles() {
        let cfg = config(&["--random", "--max-articles", "20"]).unwrap();
        assert_eq!(cfg.mode, Mode::Random);
        assert_eq!(cfg.limits.max_articles, 20);
    }

    #[test]
    fn test_search_overrides_seeds() {
        let cfg = config(&["--search", "borrow checker", "--seed", "Rust"]).unwrap();
        assert_eq!(cfg.crawl_seeds(), vec![Target::Search("borrow checker".into())]);
    }

    #[test]
    fn test_seeds_replace_start_page() {
        let cfg = config(&["--crawl", "--seed", "Rust"]).unwrap();
        assert_eq!(cfg.crawl_seeds(), vec![Target::Title("Rust".into())]);
    }

    #[test]
    fn test_db_flag_enables_sqlite() {
        let cfg = config(&["--db", "--db-path", "out/articles.db", "-o", "out/a.csv"]).unwrap();
        assert_eq!(cfg.output.sqlite_path, Some(PathBuf::from("out/articles.db")));
        assert_eq!(cfg.output.csv_path, PathBuf::from("out/a.csv"));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(config(&["--site", "nope"]), Err(ConfigError::InvalidSite(_))));
        assert!(matches!(config(&["--links-per-page", "0"]), Err(ConfigError::NoLinksPerPage)));
        assert!(matches!(config(&["--timeout-secs", "0"]), Err(ConfigError::ZeroTimeout)));
    }
}
