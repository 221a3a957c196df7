// src/extract/mod.rs
// =============================================================================
// Turning fetched HTML into Article records.
//
// Submodules:
// - article:   a regular article page (title, summary, categories, links)
// - main_page: the Main Page boxes (featured, in the news, did you know,
//              on this day)
//
// Both use the `scraper` crate's CSS selectors. The selectors below are
// constants, so parsing them cannot fail at runtime.
// =============================================================================

mod article;
mod main_page;

use scraper::{ElementRef, Selector};

use crate::article::{is_namespaced, title_key};

pub use article::extract_article;
pub use main_page::extract_main_page;

// Only ever called with the constant selectors in this module, so a parse
// failure is a bug and panicking is fine
fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap()
}

// All text under an element with whitespace collapsed
fn element_text(element: ElementRef<'_>) -> String {
    crate::article::collapse_whitespace(&element.text().collect::<String>())
}

// Title of an article link, or None for anything that is not a plain article
//
//   "/wiki/Rust_(programming_language)#History" -> Some("Rust (programming language)")
//   "/wiki/Category:Rust"                       -> None (namespace)
//   "https://example.com"                       -> None
fn article_link_title(href: &str) -> Option<String> {
    let rest = href.strip_prefix("/wiki/")?;
    let path = rest.split('#').next().unwrap_or_default();
    let key = title_key(path);

    if key.is_empty() || is_namespaced(&key) {
        return None;
    }

    Some(key)
}
