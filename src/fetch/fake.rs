// src/fetch/fake.rs
// =============================================================================
// A fetcher for tests that serves canned HTML instead of touching the network.
//
// Pages are stored by title key, so Title and /wiki/ Url targets both find
// them. Unknown pages answer HTTP 404 like the real site would.
// =============================================================================

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use super::target::{Site, Target};
use super::{Page, PageFetcher};
use crate::article::title_key;
use crate::error::FetchError;

#[derive(Default)]
pub struct FakeFetcher {
    site: Site,
    pages: HashMap<String, (String, String)>,
    random: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a minimal article page linking to `links`
    pub fn with_article(self, title: &str, links: &[&str]) -> Self {
        let html = article_html(title, &format!("{} is a test article.", title), links);
        self.with_page(title, html)
    }

    /// Serves `html` for `title`
    pub fn with_page(mut self, title: &str, html: String) -> Self {
        let url = self
            .site
            .article_url(title)
            .map(|u| u.to_string())
            .unwrap_or_default();
        self.pages.insert(title_key(title), (url, html));
        self
    }

    /// Makes `alias` redirect to the already registered page `target`
    pub fn with_redirect(mut self, alias: &str, target: &str) -> Self {
        if let Some(page) = self.pages.get(&title_key(target)).cloned() {
            self.pages.insert(title_key(alias), page);
        }
        self
    }

    /// Titles that Special:Random hands out, in order
    pub fn with_random(self, titles: &[&str]) -> Self {
        if let Ok(mut queue) = self.random.lock() {
            queue.extend(titles.iter().map(|t| t.to_string()));
        }
        self
    }

    /// Every target requested so far, in request order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn lookup(&self, key: &str) -> Result<Page, FetchError> {
        match self.pages.get(key) {
            Some((url, html)) => Ok(Page {
                url: url.clone(),
                html: html.clone(),
            }),
            None => Err(FetchError::Status {
                url: format!("https://en.wikipedia.org/wiki/{}", key.replace(' ', "_")),
                status: 404,
            }),
        }
    }
}

#[async_trait]
impl PageFetcher for FakeFetcher {
    async fn fetch(&self, target: &Target) -> Result<Page, FetchError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(target.to_string());
        }

        match target {
            Target::Random => {
                let next = self.random.lock().ok().and_then(|mut q| q.pop_front());
                match next {
                    Some(title) => self.lookup(&title_key(&title)),
                    None => Err(FetchError::Status {
                        url: "https://en.wikipedia.org/wiki/Special:Random".into(),
                        status: 503,
                    }),
                }
            }
            Target::Search(term) => self.lookup(&title_key(term)),
            other => self.lookup(&other.key()),
        }
    }
}

// Renders the parts of a Wikipedia article page the extractor looks at
pub fn article_html(title: &str, summary: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|l| format!(r#"<a href="/wiki/{}">{}</a> "#, urlencoding::encode(&l.replace(' ', "_")), l))
        .collect();

    format!(
        r#"<html><body>
<h1 id="firstHeading"><span class="mw-page-title-main">{title}</span></h1>
<div id="mw-content-text">
  <p class="mw-empty-elt"></p>
  <p>{summary}</p>
  <p>See also: {anchors}</p>
</div>
<div id="mw-normal-catlinks"><ul><li><a href="/wiki/Category:Tests">Tests</a></li></ul></div>
</body></html>"#
    )
}
