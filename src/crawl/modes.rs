// src/crawl/modes.rs
// =============================================================================
// Runs one collection mode against a fetcher.
//
//   Default  -> Main Page entries (at most 10), then random articles until
//               max_articles records are collected
//   Featured -> Main Page entries only
//   Crawl    -> breadth-first crawl from the seeds (or the start page)
//   Search   -> breadth-first crawl from the search result
//   Random   -> Special:Random samples
// =============================================================================

use tracing::info;

use super::session::{CrawlSession, Harvest};
use crate::config::{Mode, ScrapeConfig};
use crate::fetch::PageFetcher;

/// Cap on Main Page entries in default mode; random articles fill the rest
pub const DEFAULT_FEATURED_SHARE: usize = 10;

pub async fn harvest<F: PageFetcher + ?Sized>(fetcher: &F, config: &ScrapeConfig) -> Harvest {
    let mut session = CrawlSession::new(fetcher).with_delay(config.delay);
    let wanted = config.limits.max_articles;

    info!(mode = ?config.mode, wanted, "starting collection");

    match &config.mode {
        Mode::Default => {
            session
                .collect_featured(&config.start, wanted.min(DEFAULT_FEATURED_SHARE))
                .await;
            let missing = wanted.saturating_sub(session.len());
            if missing > 0 {
                session.collect_random(missing).await;
            }
        }
        Mode::Featured => {
            session.collect_featured(&config.start, wanted).await;
        }
        Mode::Crawl | Mode::Search(_) => {
            session.crawl(&config.crawl_seeds(), &config.limits).await;
        }
        Mode::Random => {
            session.collect_random(wanted).await;
        }
    }

    session.finish()
}
