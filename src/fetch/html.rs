// src/fetch/html.rs
// =============================================================================
// The default LinkExtractor: every <a href="..."> value in a page.
//
// We use the `scraper` crate which parses HTML into a DOM (on top of
// html5ever) and lets us query it with CSS selectors.
//
// Unlike a link checker, the crawler wants hrefs exactly as written: relative
// paths, fragments and mailto: links all come back untouched and in document
// order. Deciding what to do with them is the dispatcher's (and fetcher's)
// business.
// =============================================================================

use scraper::{Html, Selector};

use super::LinkExtractor;
use crate::error::ParseError;

#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlLinkExtractor;

impl HtmlLinkExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl LinkExtractor for HtmlLinkExtractor {
    fn extract_links(&self, body: &str) -> Result<Vec<String>, ParseError> {
        check_markup(body)?;

        let document = Html::parse_document(body);

        // "a[href]" is a constant and known to be valid, so this can only fail
        // on a programmer error.
        let selector = Selector::parse("a[href]").expect("static selector is valid");

        let links = document
            .select(&selector)
            .filter_map(|element| element.value().attr("href"))
            .map(str::to_string)
            .collect();

        Ok(links)
    }
}

// html5ever accepts any input, so "is this markup at all" is decided here.
// A blank body is a page without links, not an error.
fn check_markup(body: &str) -> Result<(), ParseError> {
    if body.contains('\0') {
        return Err(ParseError::BinaryContent);
    }
    if !body.trim().is_empty() && !body.contains('<') {
        return Err(ParseError::NotMarkup);
    }
    Ok(())
}
