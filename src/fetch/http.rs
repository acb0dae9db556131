// src/fetch/http.rs
// =============================================================================
// The default Fetcher: plain HTTP GET with reqwest.
//
// Key functionality:
// - One shared reqwest Client for the whole crawl (connection pooling)
// - Per-request timeout supplied by the caller
// - Non-2xx responses, non-text content and transport errors all become a
//   FetchError, which makes the worker drop the task
//
// Links are handed to us exactly as pages wrote them, so relative hrefs like
// "/docs" fail here with FetchError::InvalidUrl. Resolving them against the
// parent page is deliberately not done by the crawler.
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use url::Url;

use super::Fetcher;
use crate::error::FetchError;

const USER_AGENT: &str = concat!("link-spider/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let target = parse_target(url)?;

        let response = self.client.get(target).send().await.map_err(categorize_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        // A missing content-type is accepted; servers omit it often enough.
        if let Some(content_type) = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !is_textual(content_type) {
                return Err(FetchError::UnsupportedContentType(content_type.to_string()));
            }
        }

        response.text().await.map_err(categorize_error)
    }
}

// Only absolute http(s) URLs can be requested.
fn parse_target(url: &str) -> Result<Url, FetchError> {
    match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(parsed),
        _ => Err(FetchError::InvalidUrl(url.to_string())),
    }
}

fn is_textual(content_type: &str) -> bool {
    let mime = content_type.to_ascii_lowercase();
    mime.starts_with("text/") || mime.contains("html") || mime.contains("xml")
}

// Maps reqwest's error flags onto our taxonomy.
fn categorize_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_connect() {
        FetchError::Connect(error.to_string())
    } else {
        FetchError::Request(error)
    }
}
