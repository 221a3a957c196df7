// src/lib.rs
// =============================================================================
// Library side of wiki-scraper. The binary in main.rs only parses arguments,
// sets up logging and wires these modules together.
//
//   fetch    -> get pages (PageFetcher trait, reqwest implementation)
//   extract  -> HTML to Article records
//   crawl    -> frontier, per-run session and collection modes
//   sink     -> CSV / SQLite outputs
//   cli, config, logging, error -> the ambient plumbing
// =============================================================================

pub mod article;
pub mod cli;
pub mod config;
pub mod crawl;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod logging;
pub mod sink;

pub use article::Article;
