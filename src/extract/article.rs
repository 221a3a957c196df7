// src/extract/article.rs
// =============================================================================
// Extracts one Article from a rendered Wikipedia article page.
//
// What we read (MediaWiki's standard skin markup):
//   #firstHeading                       -> title (required)
//   #mw-content-text                    -> article body (required)
//   #mw-content-text p:not(.mw-empty-elt) -> first non-empty paragraph = summary
//   #mw-normal-catlinks ul li a         -> categories
//   .infobox img, .thumb img            -> lead image
//   #mw-content-text a[href^='/wiki/']  -> outbound article links
//
// A page without a heading or body is not an article (an error page, a
// captcha, a login wall...). That is a ParseError, which the crawler logs
// and skips.
// =============================================================================

use std::collections::HashSet;

use chrono::Utc;
use scraper::Html;
use url::Url;

use super::{article_link_title, element_text, selector};
use crate::article::{title_key, Article};
use crate::error::ParseError;
use crate::fetch::Page;

pub fn extract_article(page: &Page) -> Result<Article, ParseError> {
    let document = Html::parse_document(&page.html);

    let title = document
        .select(&selector("#firstHeading"))
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| missing("#firstHeading", page))?;

    let content = document
        .select(&selector("#mw-content-text"))
        .next()
        .ok_or_else(|| missing("#mw-content-text", page))?;

    // The first paragraph is often an empty placeholder, skip those
    let summary = content
        .select(&selector("p:not(.mw-empty-elt)"))
        .map(element_text)
        .find(|text| !text.is_empty())
        .unwrap_or_default();

    let categories = document
        .select(&selector("#mw-normal-catlinks ul li a"))
        .map(element_text)
        .filter(|c| !c.is_empty())
        .collect();

    let base = Url::parse(&page.url).ok();
    let image_url = document
        .select(&selector(".infobox img, .thumb img"))
        .filter_map(|img| img.value().attr("src"))
        .next()
        .map(|src| resolve(base.as_ref(), src));

    // Outbound links in page order, each title once, never ourselves
    let own_key = title_key(&title);
    let mut seen = HashSet::new();
    let links = content
        .select(&selector("a[href^='/wiki/']"))
        .filter_map(|a| a.value().attr("href"))
        .filter_map(article_link_title)
        .filter(|link| *link != own_key && seen.insert(link.clone()))
        .collect();

    Ok(Article {
        title,
        url: page.url.clone(),
        summary,
        links,
        categories,
        image_url,
        scraped_at: Utc::now(),
    })
}

fn missing(selector: &'static str, page: &Page) -> ParseError {
    ParseError::MissingElement {
        selector,
        url: page.url.clone(),
    }
}

// Image sources are usually protocol-relative ("//upload.wikimedia.org/...")
fn resolve(base: Option<&Url>, src: &str) -> String {
    base.and_then(|b| b.join(src).ok())
        .map(|u| u.to_string())
        .unwrap_or_else(|| src.to_string())
}
