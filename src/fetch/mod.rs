// src/fetch/mod.rs
// =============================================================================
// The crawler's two outside collaborators.
//
// - Fetcher:       URL in, page body out (or a FetchError)
// - LinkExtractor: page body in, raw href strings out (or a ParseError)
//
// The crawl engine in src/crawl/ only ever talks to these traits, so it can be
// driven by the real HTTP + HTML implementations below or by in-memory fakes
// in tests.
//
// Submodules:
// - http: reqwest-based Fetcher
// - html: scraper-based LinkExtractor
// =============================================================================

mod html;
mod http;

use async_trait::async_trait;

use crate::error::{FetchError, ParseError};

pub use html::HtmlLinkExtractor;
pub use http::HttpFetcher;

/// Retrieves the raw content behind a URL.
///
/// Implementations own all transport concerns (timeouts, TLS, redirects).
/// No retries: a failure drops the task.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Pulls outbound links from page content.
///
/// Returned hrefs are raw attribute values in document order: no
/// absolutization, no normalization, no scheme filtering. Calling it twice on
/// the same content must give the same sequence.
pub trait LinkExtractor: Send + Sync {
    fn extract_links(&self, body: &str) -> Result<Vec<String>, ParseError>;
}
