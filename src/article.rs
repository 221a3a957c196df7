// src/article.rs
// =============================================================================
// The record we collect for every Wikipedia article, plus the helpers that
// decide when two titles mean "the same article".
//
// Wikipedia titles come to us in several spellings:
// - "Python (programming language)"      (heading text)
// - "Python_(programming_language)"      (URL path)
// - "Python_%28programming_language%29"  (percent-encoded href)
// - "python (programming language)"      (first letter is case-insensitive)
//
// All of them normalise to the same *title key*, which is what the crawler
// uses for its visited set and what keeps output rows unique.
// =============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp layout for the `date_scraped` column
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One collected article. Immutable once the extractor has built it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub url: String,
    pub summary: String,
    /// Outbound article titles in page order, without duplicates
    pub links: Vec<String>,
    pub categories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub scraped_at: DateTime<Utc>,
}

impl Article {
    /// Key used for uniqueness checks (see `title_key`)
    pub fn key(&self) -> String {
        title_key(&self.title)
    }

    pub fn date_scraped(&self) -> String {
        self.scraped_at.format(DATE_FORMAT).to_string()
    }
}

// Normalises a title (or the tail of a /wiki/ path) into its title key
//
// Steps:
//   1. percent-decode (invalid escapes are kept as-is)
//   2. '_' becomes ' '
//   3. runs of whitespace collapse to one space, ends trimmed
//   4. first character upper-cased, like MediaWiki does
pub fn title_key(raw: &str) -> String {
    let decoded = urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string());

    let spaced = decoded.replace('_', " ");
    let collapsed = collapse_whitespace(&spaced);

    let mut chars = collapsed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// True for titles outside the main article namespace ("Special:Search",
/// "Category:Rust", "Help:Contents"). Any colon counts.
pub fn is_namespaced(key: &str) -> bool {
    key.contains(':')
}

// Joins all whitespace runs into single spaces and trims the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
