// src/fetch/mod.rs
// =============================================================================
// Getting pages from the wiki.
//
// Submodules:
// - target: what to fetch (Title / Url / Random / Search) and where it lives
// - http:   the real fetcher built on reqwest
// - fake:   canned pages for tests (test builds only)
//
// Everything that needs a page goes through the PageFetcher trait, so the
// crawler never knows whether it is talking to Wikipedia or to a test.
// =============================================================================

mod http;
mod target;

#[cfg(test)]
pub mod fake;

use async_trait::async_trait;

use crate::error::FetchError;

pub use http::HttpFetcher;
pub use target::{wiki_title, Site, Target, DEFAULT_SITE};

/// A fetched page: where we ended up and what it said
#[derive(Debug, Clone)]
pub struct Page {
    pub url: String,
    pub html: String,
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, target: &Target) -> Result<Page, FetchError>;
}
