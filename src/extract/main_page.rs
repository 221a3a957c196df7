// src/extract/main_page.rs
// =============================================================================
// Reads the boxes on Wikipedia's Main Page into records without visiting the
// linked articles:
//
//   #mp-tfa  Today's featured article (one entry, bold link in a paragraph)
//   #mp-itn  In the news
//   #mp-dyk  Did you know
//   #mp-otd  On this day
//
// For list boxes each <li> becomes one record: the first article link gives
// the title and URL, the whole item text is the summary, and the box label
// is the only category.
// =============================================================================

use std::collections::HashSet;

use chrono::Utc;
use scraper::{ElementRef, Html};
use url::Url;

use super::{article_link_title, element_text, selector};
use crate::article::Article;
use crate::error::ParseError;
use crate::fetch::Page;

/// How many entries we take from each list box
pub const ENTRIES_PER_SECTION: usize = 5;

pub const FEATURED_LABEL: &str = "Featured";

/// (list item selector, category label) for the list boxes
pub const MAIN_PAGE_SECTIONS: &[(&str, &str)] = &[
    ("#mp-itn ul li", "In the news"),
    ("#mp-dyk ul li", "Did you know"),
    ("#mp-otd ul li", "On this day"),
];

pub fn extract_main_page(page: &Page) -> Result<Vec<Article>, ParseError> {
    let document = Html::parse_document(&page.html);
    let base = Url::parse(&page.url).ok();

    let featured = document
        .select(&selector("#mp-tfa"))
        .next()
        .ok_or_else(|| ParseError::MissingElement {
            selector: "#mp-tfa",
            url: page.url.clone(),
        })?;

    let mut articles = Vec::new();
    let mut seen = HashSet::new();

    let tfa_summary = featured
        .select(&selector("p"))
        .next()
        .map(element_text)
        .unwrap_or_default();

    if let Some(article) = featured
        .select(&selector("p b a"))
        .find_map(|link| entry(link, &tfa_summary, FEATURED_LABEL, base.as_ref()))
    {
        seen.insert(article.key());
        articles.push(article);
    }

    for &(css, label) in MAIN_PAGE_SECTIONS {
        let items: Vec<ElementRef<'_>> = document
            .select(&selector(css))
            .take(ENTRIES_PER_SECTION)
            .collect();

        for item in items {
            let summary = element_text(item);
            let found = item
                .select(&selector("a[href]"))
                .find_map(|link| entry(link, &summary, label, base.as_ref()));

            if let Some(article) = found {
                if seen.insert(article.key()) {
                    articles.push(article);
                }
            }
        }
    }

    Ok(articles)
}

// Builds a record from a link, if it points at a plain article
fn entry(link: ElementRef<'_>, summary: &str, label: &str, base: Option<&Url>) -> Option<Article> {
    let href = link.value().attr("href")?;
    let title = article_link_title(href)?;

    let url = base
        .and_then(|b| b.join(href).ok())
        .map(|u| u.to_string())
        .unwrap_or_else(|| href.to_string());

    Some(Article {
        title,
        url,
        summary: summary.to_string(),
        links: Vec::new(),
        categories: vec![label.to_string()],
        image_url: None,
        scraped_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(html: &str) -> Page {
        Page {
            url: "https://en.wikipedia.org/wiki/Main_Page".to_string(),
            html: html.to_string(),
        }
    }

    fn list(id: &str, count: usize) -> String {
        let items: String = (0..count)
            .map(|i| {
                format!(
                    r#"<li><a href="/wiki/File:Pic{i}.jpg">pic</a> Item {i} of <a href="/wiki/{id}_story_{i}">{id} story {i}</a>.</li>"#
                )
            })
            .collect();
        format!(r#"<div id="mp-{id}"><ul>{items}</ul></div>"#)
    }

    fn main_page() -> String {
        format!(
            r#"<html><body>
<div id="mp-tfa"><p><b><a href="/wiki/Featured_thing">Featured thing</a></b> is today's featured article.</p></div>
{}{}{}
</body></html>"#,
            list("itn", 7),
            list("dyk", 2),
            list("otd", 0),
        )
    }

    #[test]
    fn test_featured_article_comes_first() {
        let articles = extract_main_page(&page(&main_page())).unwrap();
        let first = &articles[0];
        assert_eq!(first.title, "Featured thing");
        assert_eq!(first.url, "https://en.wikipedia.org/wiki/Featured_thing");
        assert_eq!(first.summary, "Featured thing is today's featured article.");
        assert_eq!(first.categories, vec![FEATURED_LABEL]);
    }

    #[test]
    fn test_sections_are_capped_and_labelled() {
        let articles = extract_main_page(&page(&main_page())).unwrap();

        // 1 featured + 5 of 7 news + 2 dyk + 0 otd
        assert_eq!(articles.len(), 8);
        let news: Vec<_> = articles
            .iter()
            .filter(|a| a.categories == vec!["In the news".to_string()])
            .collect();
        assert_eq!(news.len(), ENTRIES_PER_SECTION);
        assert_eq!(news[0].title, "Itn story 0");
        assert_eq!(news[0].summary, "pic Item 0 of itn story 0.");
    }

    #[test]
    fn test_missing_featured_box_is_parse_error() {
        let err = extract_main_page(&page("<html><body></body></html>")).unwrap_err();
        assert!(matches!(err, ParseError::MissingElement { selector: "#mp-tfa", .. }));
    }

    #[test]
    fn test_duplicate_entries_collapse() {
        let html = r#"<div id="mp-tfa"><p><b><a href="/wiki/Same">Same</a></b></p></div>
<div id="mp-itn"><ul><li><a href="/wiki/Same">Same</a> again</li></ul></div>"#;
        let articles = extract_main_page(&page(html)).unwrap();
        assert_eq!(articles.len(), 1);
    }
}
