// src/error.rs
// =============================================================================
// Typed errors for each stage of the pipeline.
//
// - FetchError: a page could not be retrieved (skipped by the crawler)
// - ParseError: a page did not look like what we expected (skipped too)
// - PageError:  either of the two above, for the crawler's skip log
// - SinkError:  writing CSV/SQLite failed (fatal, bubbles up to main)
// - ConfigError: the command line does not make sense (fatal)
//
// main.rs works with anyhow::Result; these enums convert into it through `?`
// because thiserror implements std::error::Error for them.
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid target '{0}'")]
    InvalidTarget(String),

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// True for "the page does not exist" (404 / 410)
    pub fn is_missing(&self) -> bool {
        matches!(self, FetchError::Status { status: 404 | 410, .. })
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("expected element '{selector}' not found on {url}")]
    MissingElement { selector: &'static str, url: String },

    #[error("{url} is not an article page")]
    NotAnArticle { url: String },
}

/// Why a single page was skipped
#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("could not serialise links: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("--site must be an absolute http(s) URL, got '{0}'")]
    InvalidSite(String),

    #[error("--links-per-page must be at least 1")]
    NoLinksPerPage,

    #[error("--timeout-secs must be at least 1")]
    ZeroTimeout,
}
