// src/fetch/http.rs
// =============================================================================
// The real page fetcher: one reqwest client for the whole run.
//
// The client is our "browser session". It is created once in main, reused
// for every page (connection pooling), and released when the fetcher is
// dropped, which happens on every exit path including errors.
//
// Wikipedia serves fully rendered article HTML, so a plain GET is enough.
// Redirects are followed (Special:Random and search both redirect), and the
// final URL is reported back so the record points at the real article.
// =============================================================================

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::target::{Site, Target};
use super::{Page, PageFetcher};
use crate::error::FetchError;

// A few ordinary desktop browser user agents; one is picked per session
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0",
];

pub struct HttpFetcher {
    client: Client,
    site: Site,
    fetched: AtomicUsize,
}

impl HttpFetcher {
    pub fn new(site: Site, timeout: Duration) -> Result<Self, reqwest::Error> {
        let user_agent = USER_AGENTS[fastrand::usize(..USER_AGENTS.len())];

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        debug!(site = %site.base(), user_agent, "http session opened");

        Ok(HttpFetcher {
            client,
            site,
            fetched: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, target: &Target) -> Result<Page, FetchError> {
        let url = self.site.resolve(target)?;

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Transport { url: url.to_string(), source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // After redirects this is the article we actually landed on
        let final_url = response.url().to_string();

        let html = response
            .text()
            .await
            .map_err(|source| FetchError::Transport { url: final_url.clone(), source })?;

        self.fetched.fetch_add(1, Ordering::Relaxed);
        debug!(%target, url = %final_url, bytes = html.len(), "fetched page");

        Ok(Page { url: final_url, html })
    }
}

impl Drop for HttpFetcher {
    fn drop(&mut self) {
        debug!(pages = self.fetched.load(Ordering::Relaxed), "http session closed");
    }
}
