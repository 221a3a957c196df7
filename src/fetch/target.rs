// src/fetch/target.rs
// =============================================================================
// Addressing pages on a MediaWiki site.
//
// A Target says *what* we want (an article title, a full URL, a random
// article, a search); Site knows *where* that lives for the configured wiki.
//
// Example (site = https://en.wikipedia.org):
//   Title("Rust (programming language)")
//     -> https://en.wikipedia.org/wiki/Rust_%28programming_language%29
//   Random
//     -> https://en.wikipedia.org/wiki/Special:Random
//   Search("borrow checker")
//     -> https://en.wikipedia.org/w/index.php?search=borrow+checker&title=Special%3ASearch&go=Go
// =============================================================================

use std::fmt;

use url::Url;

use crate::article::title_key;
use crate::error::{ConfigError, FetchError};

pub const DEFAULT_SITE: &str = "https://en.wikipedia.org";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Title(String),
    Url(String),
    Random,
    Search(String),
}

impl Target {
    /// Absolute http(s) URLs become `Url`, anything else is treated as a title
    pub fn parse(input: &str) -> Target {
        let input = input.trim();
        if input.starts_with("http://") || input.starts_with("https://") {
            Target::Url(input.to_string())
        } else {
            Target::Title(input.to_string())
        }
    }

    // The key the frontier uses for its visited set
    //
    // Article URLs and titles share the title-key space, so
    // "https://en.wikipedia.org/wiki/Rust" and "Rust" are the same page.
    pub fn key(&self) -> String {
        match self {
            Target::Title(title) => title_key(title),
            Target::Url(raw) => match Url::parse(raw).ok().and_then(|u| wiki_title(&u)) {
                Some(title) => title_key(&title),
                None => raw.clone(),
            },
            Target::Random => "Special:Random".to_string(),
            Target::Search(term) => format!("Special:Search/{}", term.trim()),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Title(title) => write!(f, "{}", title),
            Target::Url(url) => write!(f, "{}", url),
            Target::Random => write!(f, "<random article>"),
            Target::Search(term) => write!(f, "<search '{}'>", term),
        }
    }
}

// Returns the article part of a /wiki/ URL ("/wiki/Foo_bar#History" -> "Foo_bar")
pub fn wiki_title(url: &Url) -> Option<String> {
    let rest = url.path().strip_prefix("/wiki/")?;
    if rest.is_empty() {
        None
    } else {
        Some(rest.to_string())
    }
}

/// The wiki we are talking to
#[derive(Debug, Clone)]
pub struct Site {
    base: Url,
}

impl Site {
    pub fn new(base: &str) -> Result<Site, ConfigError> {
        let base = Url::parse(base).map_err(|_| ConfigError::InvalidSite(base.to_string()))?;

        if !matches!(base.scheme(), "http" | "https") || base.host_str().is_none() {
            return Err(ConfigError::InvalidSite(base.to_string()));
        }

        Ok(Site { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    // Resolves a target to the URL we actually request
    pub fn resolve(&self, target: &Target) -> Result<Url, FetchError> {
        match target {
            Target::Title(title) => self.article_url(title),
            Target::Url(raw) => {
                Url::parse(raw).map_err(|_| FetchError::InvalidTarget(raw.clone()))
            }
            Target::Random => self.join("/wiki/Special:Random"),
            Target::Search(term) => {
                if term.trim().is_empty() {
                    return Err(FetchError::InvalidTarget(target.to_string()));
                }
                let mut url = self.join("/w/index.php")?;
                url.query_pairs_mut()
                    .append_pair("search", term.trim())
                    .append_pair("title", "Special:Search")
                    .append_pair("go", "Go");
                Ok(url)
            }
        }
    }

    // Builds /wiki/<Title_with_underscores>, percent-encoded
    pub fn article_url(&self, title: &str) -> Result<Url, FetchError> {
        let key = title_key(title);
        if key.is_empty() {
            return Err(FetchError::InvalidTarget(title.to_string()));
        }

        let path = format!("/wiki/{}", urlencoding::encode(&key.replace(' ', "_")));
        self.join(&path)
    }

    fn join(&self, path: &str) -> Result<Url, FetchError> {
        self.base
            .join(path)
            .map_err(|_| FetchError::InvalidTarget(path.to_string()))
    }
}

impl Default for Site {
    fn default() -> Self {
        Site {
            base: Url::parse(DEFAULT_SITE).expect("DEFAULT_SITE is a valid URL"),
        }
    }
}
