// src/crawl/mod.rs
// =============================================================================
// This module handles collecting articles.
//
// Features:
// - Breadth-first crawling from one or more seeds
// - Depth limit, article limit and a per-page link limit
// - Random article sampling and Main Page collection
// - Polite crawling with a delay between requests
//
// Submodules:
// - frontier: queue of pages to visit + visited set
// - session:  per-run state and the collection methods
// - modes:    picks the collection methods for the configured Mode
// =============================================================================

mod frontier;
mod modes;
mod session;

pub use frontier::{CrawlItem, Frontier};
pub use modes::harvest;
pub use session::{crawl, CrawlLimits, CrawlSession, Harvest, HarvestStats};
