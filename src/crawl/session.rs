// src/crawl/session.rs
// =============================================================================
// A collection run: the state shared by every way of gathering articles.
//
// CrawlSession owns what used to be "globals" in a scraping script:
//   - the records collected so far
//   - the set of collected title keys (so no title is ever written twice)
//   - counters for attempted / failed / duplicate pages
//
// Each collection method (crawl, collect_random, collect_featured) adds to
// the same session, so a run can mix them (the default mode does) and still
// produce unique titles.
//
// Failure policy: one page failing to fetch or parse is logged and skipped.
// Nothing is retried, and nothing short of a programming error stops a run.
//
// Rust concepts used:
// - Generic over `F: PageFetcher + ?Sized`: works with HttpFetcher, the test
//   FakeFetcher, or a `dyn PageFetcher`
// - Lifetime 'a: the session borrows the fetcher, it never owns it
// - let-else: `let Some(x) = ... else { continue };` for early exits in loops
// =============================================================================

use std::collections::HashSet;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::frontier::Frontier;
use crate::article::{is_namespaced, title_key, Article};
use crate::error::{PageError, ParseError};
use crate::extract::{extract_article, extract_main_page};
use crate::fetch::{wiki_title, PageFetcher, Target};

/// Special:Random may hand out an article we already have; give up after
/// this many tries per wanted article
pub const RANDOM_ATTEMPTS_PER_ARTICLE: usize = 3;

/// Random sampling also stops after this many requests in a row that brought
/// nothing new (failures or duplicates)
pub const RANDOM_MISSES_IN_A_ROW: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlLimits {
    pub max_articles: usize,
    pub max_depth: usize,
    /// Outbound links of each article that are queued for the next depth
    pub links_per_page: usize,
}

impl Default for CrawlLimits {
    fn default() -> Self {
        CrawlLimits {
            max_articles: 25,
            max_depth: 2,
            links_per_page: 10,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HarvestStats {
    /// Pages requested
    pub attempted: usize,
    pub collected: usize,
    /// Pages skipped because fetching or parsing failed
    pub failed: usize,
    /// Pages that turned out to be an article we already had
    pub duplicates: usize,
}

/// The result of a run
#[derive(Debug, Clone)]
pub struct Harvest {
    pub articles: Vec<Article>,
    pub stats: HarvestStats,
}

pub struct CrawlSession<'a, F: PageFetcher + ?Sized> {
    fetcher: &'a F,
    delay: Duration,
    collected: HashSet<String>,
    articles: Vec<Article>,
    stats: HarvestStats,
}

impl<'a, F: PageFetcher + ?Sized> CrawlSession<'a, F> {
    pub fn new(fetcher: &'a F) -> Self {
        CrawlSession {
            fetcher,
            delay: Duration::ZERO,
            collected: HashSet::new(),
            articles: Vec::new(),
            stats: HarvestStats::default(),
        }
    }

    /// Pause between two page requests
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Records collected so far
    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    // Breadth-first crawl from `seeds`
    //
    // Parameters:
    // - seeds: starting pages, all at depth 0 (duplicates are ignored)
    // - limits: max articles, max depth and links queued per page
    //
    // Links of a depth-d article are followed only while d + 1 <= max_depth.
    // Returns: the number of records this call added (at most max_articles)
    pub async fn crawl(&mut self, seeds: &[Target], limits: &CrawlLimits) -> usize {
        if limits.max_articles == 0 {
            return 0;
        }

        let mut frontier = Frontier::new(limits.max_depth);
        for seed in seeds {
            frontier.seed(seed.clone());
        }

        let mut added = 0;
        while added < limits.max_articles {
            let Some(item) = frontier.next() else {
                break;
            };

            // Collected by an earlier phase of this session
            if self.collected.contains(&item.target.key()) {
                continue;
            }

            debug!(depth = item.depth, target = %item.target, queued = frontier.len(), "visiting");

            let Some(article) = self.fetch_article(&item.target).await else {
                continue;
            };

            // A redirect may have landed us on a page under another name
            frontier.mark_visited(article.key());
            let links = article.links.clone();

            if !self.accept(article) {
                continue;
            }
            added += 1;

            if added < limits.max_articles {
                let queued = frontier.discover(&item, links, limits.links_per_page);
                debug!(depth = item.depth + 1, queued, "queued links");
            }
        }

        info!(added, max_depth = limits.max_depth, "crawl finished");
        added
    }

    // Samples articles through Special:Random
    //
    // Parameters:
    // - count: how many new articles we want
    //
    // Returns: how many were actually added. That is fewer than `count` when
    // the attempt budget (count x RANDOM_ATTEMPTS_PER_ARTICLE) runs out or
    // RANDOM_MISSES_IN_A_ROW requests in a row brought nothing new.
    pub async fn collect_random(&mut self, count: usize) -> usize {
        let max_attempts = count.saturating_mul(RANDOM_ATTEMPTS_PER_ARTICLE);
        let mut added = 0;
        let mut attempts = 0;
        let mut misses = 0;

        while added < count && attempts < max_attempts && misses < RANDOM_MISSES_IN_A_ROW {
            attempts += 1;
            let accepted = match self.fetch_article(&Target::Random).await {
                Some(article) => self.accept(article),
                None => false,
            };

            if accepted {
                added += 1;
                misses = 0;
            } else {
                misses += 1;
            }
        }

        if added < count {
            warn!(added, wanted = count, attempts, "gave up on random articles");
        }
        info!(added, "collected random articles");
        added
    }

    // Takes up to `count` entries from the Main Page boxes
    pub async fn collect_featured(&mut self, main_page: &Target, count: usize) -> usize {
        if count == 0 {
            return 0;
        }

        self.pause().await;
        self.stats.attempted += 1;

        let entries: Result<Vec<Article>, PageError> = match self.fetcher.fetch(main_page).await {
            Ok(page) => extract_main_page(&page).map_err(PageError::from),
            Err(e) => Err(e.into()),
        };

        let entries = match entries {
            Ok(entries) => entries,
            Err(e) => {
                self.skip(main_page, &e);
                return 0;
            }
        };

        let mut added = 0;
        for article in entries {
            if added >= count {
                break;
            }
            if self.accept(article) {
                added += 1;
            }
        }

        info!(added, "collected main page articles");
        added
    }

    pub fn finish(self) -> Harvest {
        Harvest {
            articles: self.articles,
            stats: self.stats,
        }
    }

    // Fetches and extracts one article; failures are logged and counted
    async fn fetch_article(&mut self, target: &Target) -> Option<Article> {
        self.pause().await;
        self.stats.attempted += 1;

        let result: Result<Article, PageError> = match self.fetcher.fetch(target).await {
            Ok(page) => {
                // A search with no exact match stays on Special:Search
                let landed_on_article = url::Url::parse(&page.url)
                    .ok()
                    .and_then(|u| wiki_title(&u))
                    .map(|title| !is_namespaced(&title_key(&title)))
                    .unwrap_or(false);

                if matches!(target, Target::Search(_)) && !landed_on_article {
                    Err(ParseError::NotAnArticle { url: page.url }.into())
                } else {
                    extract_article(&page).map_err(PageError::from)
                }
            }
            Err(e) => Err(e.into()),
        };

        match result {
            Ok(article) => Some(article),
            Err(e) => {
                self.skip(target, &e);
                None
            }
        }
    }

    fn accept(&mut self, article: Article) -> bool {
        if !self.collected.insert(article.key()) {
            self.stats.duplicates += 1;
            debug!(title = %article.title, "already collected");
            return false;
        }

        info!(title = %article.title, url = %article.url, "collected article");
        self.articles.push(article);
        self.stats.collected += 1;
        true
    }

    fn skip(&mut self, target: &Target, error: &PageError) {
        self.stats.failed += 1;
        match error {
            PageError::Fetch(e) if e.is_missing() => {
                warn!(%target, "page does not exist, skipping")
            }
            _ => warn!(%target, error = %error, "skipping page"),
        }
    }

    // Polite crawling: wait between requests, not before the first one
    async fn pause(&self) {
        if self.stats.attempted > 0 && !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// Crawls with a fresh session and returns what it collected
pub async fn crawl<F: PageFetcher + ?Sized>(
    fetcher: &F,
    seeds: &[Target],
    limits: &CrawlLimits,
) -> Harvest {
    let mut session = CrawlSession::new(fetcher);
    session.crawl(seeds, limits).await;
    session.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::fake::{article_html, FakeFetcher};

    fn limits(max_articles: usize, max_depth: usize) -> CrawlLimits {
        CrawlLimits {
            max_articles,
            max_depth,
            links_per_page: 10,
        }
    }

    fn title(t: &str) -> Target {
        Target::Title(t.to_string())
    }

    fn titles(harvest: &Harvest) -> Vec<&str> {
        harvest.articles.iter().map(|a| a.title.as_str()).collect()
    }

    #[tokio::test]
    async fn test_single_seed_single_article() {
        let fetcher = FakeFetcher::new()
            .with_article("Python (programming language)", &["Guido van Rossum", "CPython"])
            .with_article("Guido van Rossum", &[])
            .with_article("CPython", &[]);

        let harvest = crawl(&fetcher, &[title("Python (programming language)")], &limits(1, 2)).await;

        assert_eq!(titles(&harvest), vec!["Python (programming language)"]);
        assert_eq!(fetcher.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_zero_articles_fetches_nothing() {
        let fetcher = FakeFetcher::new().with_article("Rust", &[]);
        let harvest = crawl(&fetcher, &[title("Rust")], &limits(0, 2)).await;

        assert!(harvest.articles.is_empty());
        assert!(fetcher.calls().is_empty());
        assert_eq!(harvest.stats, HarvestStats::default());
    }

    #[tokio::test]
    async fn test_breadth_first_order() {
        let fetcher = FakeFetcher::new()
            .with_article("A", &["B", "C"])
            .with_article("B", &["D"])
            .with_article("C", &["E"])
            .with_article("D", &[])
            .with_article("E", &[]);

        let harvest = crawl(&fetcher, &[title("A")], &limits(10, 2)).await;
        assert_eq!(titles(&harvest), vec!["A", "B", "C", "D", "E"]);
    }

    #[tokio::test]
    async fn test_respects_max_articles() {
        let links: Vec<String> = (0..10).map(|i| format!("Leaf {}", i)).collect();
        let link_refs: Vec<&str> = links.iter().map(|s| s.as_str()).collect();

        let mut fetcher = FakeFetcher::new().with_article("Hub", &link_refs);
        for leaf in &link_refs {
            fetcher = fetcher.with_article(leaf, &["Hub"]);
        }

        let harvest = crawl(&fetcher, &[title("Hub")], &limits(3, 3)).await;
        assert_eq!(harvest.articles.len(), 3);
        assert_eq!(fetcher.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_respects_max_depth() {
        let fetcher = FakeFetcher::new()
            .with_article("A", &["B"])
            .with_article("B", &["C"])
            .with_article("C", &["D"])
            .with_article("D", &[]);

        let harvest = crawl(&fetcher, &[title("A")], &limits(10, 1)).await;
        assert_eq!(titles(&harvest), vec!["A", "B"]);

        let harvest = crawl(&fetcher, &[title("A")], &limits(10, 0)).await;
        assert_eq!(titles(&harvest), vec!["A"]);
    }

    #[tokio::test]
    async fn test_cycles_and_redirects_do_not_duplicate() {
        let fetcher = FakeFetcher::new()
            .with_article("A", &["B", "Alias of B", "A"])
            .with_article("B", &["A"])
            .with_redirect("Alias of B", "B");

        let harvest = crawl(&fetcher, &[title("A"), title("a")], &limits(10, 3)).await;

        assert_eq!(titles(&harvest), vec!["A", "B"]);
        assert_eq!(harvest.stats.duplicates, 1);
    }

    #[tokio::test]
    async fn test_missing_seed_is_skipped() {
        let fetcher = FakeFetcher::new().with_article("Rust", &[]);

        let harvest = crawl(&fetcher, &[title("No such article"), title("Rust")], &limits(5, 1)).await;

        assert_eq!(titles(&harvest), vec!["Rust"]);
        assert_eq!(harvest.stats.failed, 1);
        assert_eq!(harvest.stats.attempted, 2);
    }

    #[tokio::test]
    async fn test_unparseable_page_is_skipped() {
        let fetcher = FakeFetcher::new()
            .with_page("Broken", "<html><body>maintenance</body></html>".to_string())
            .with_article("Rust", &[]);

        let harvest = crawl(&fetcher, &[title("Broken"), title("Rust")], &limits(5, 0)).await;
        assert_eq!(titles(&harvest), vec!["Rust"]);
        assert_eq!(harvest.stats.failed, 1);
    }

    #[tokio::test]
    async fn test_links_per_page() {
        let fetcher = FakeFetcher::new()
            .with_article("A", &["B", "C", "D"])
            .with_article("B", &[])
            .with_article("C", &[])
            .with_article("D", &[]);

        let limits = CrawlLimits {
            max_articles: 10,
            max_depth: 1,
            links_per_page: 2,
        };
        let harvest = crawl(&fetcher, &[title("A")], &limits).await;
        assert_eq!(titles(&harvest), vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_search_seed() {
        let fetcher = FakeFetcher::new().with_article("Borrow checker", &[]);
        let harvest = crawl(&fetcher, &[Target::Search("borrow checker".into())], &limits(1, 1)).await;
        assert_eq!(titles(&harvest), vec!["Borrow checker"]);
    }

    #[tokio::test]
    async fn test_search_results_page_is_not_an_article() {
        let fetcher = FakeFetcher::new()
            .with_page("Special:Search", article_html("Search results", "No match.", &["Rust"]))
            .with_redirect("no such thing", "Special:Search")
            .with_article("Rust", &[]);

        let harvest = crawl(&fetcher, &[Target::Search("no such thing".into())], &limits(5, 2)).await;
        assert!(harvest.articles.is_empty());
        assert_eq!(harvest.stats.failed, 1);
        assert_eq!(fetcher.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_random_skips_duplicates() {
        let fetcher = FakeFetcher::new()
            .with_article("A", &[])
            .with_article("B", &[])
            .with_random(&["A", "A", "B"]);

        let mut session = CrawlSession::new(&fetcher);
        assert_eq!(session.collect_random(2).await, 2);

        let harvest = session.finish();
        assert_eq!(titles(&harvest), vec!["A", "B"]);
        assert_eq!(harvest.stats.duplicates, 1);
    }

    #[tokio::test]
    async fn test_random_gives_up() {
        let fetcher = FakeFetcher::new().with_article("A", &[]).with_random(&["A"; 10]);

        let mut session = CrawlSession::new(&fetcher);
        assert_eq!(session.collect_random(2).await, 1);
        assert_eq!(fetcher.calls().len(), 2 * RANDOM_ATTEMPTS_PER_ARTICLE);
    }

    #[tokio::test]
    async fn test_random_with_huge_count_stops_on_misses() {
        let fetcher = FakeFetcher::new()
            .with_article("A", &[])
            .with_article("B", &[])
            .with_random(&["A", "B"]);
        let mut session = CrawlSession::new(&fetcher);

        // Nothing left after A and B: every further request fails
        assert_eq!(session.collect_random(usize::MAX / 2).await, 2);
        assert_eq!(fetcher.calls().len(), 2 + RANDOM_MISSES_IN_A_ROW);
    }

    #[tokio::test]
    async fn test_featured_then_crawl_share_uniqueness() {
        let main_page = r#"<div id="mp-tfa"><p><b><a href="/wiki/A">A</a></b> is featured.</p></div>
<div id="mp-itn"><ul><li><a href="/wiki/B">B</a> happened.</li></ul></div>"#;

        let fetcher = FakeFetcher::new()
            .with_page("Main Page", main_page.to_string())
            .with_article("A", &["C"])
            .with_article("C", &[]);

        let mut session = CrawlSession::new(&fetcher);
        assert_eq!(session.collect_featured(&title("Main Page"), 10).await, 2);

        // A is already collected, so the crawl starts from nothing new
        assert_eq!(session.crawl(&[title("A"), title("C")], &limits(5, 1)).await, 1);

        let harvest = session.finish();
        assert_eq!(titles(&harvest), vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_featured_failure_is_not_fatal() {
        let fetcher = FakeFetcher::new()
            .with_page("Main Page", article_html("Main Page", "Welcome", &[]));

        let mut session = CrawlSession::new(&fetcher);
        assert_eq!(session.collect_featured(&title("Main Page"), 10).await, 0);
        assert_eq!(session.finish().stats.failed, 1);
    }
}
