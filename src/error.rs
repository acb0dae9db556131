// src/error.rs
// =============================================================================
// Error types for the crawler.
//
// - FetchError:  a page could not be downloaded (recoverable, task dropped)
// - ParseError:  a page could not be read as markup (recoverable, task dropped)
// - ConfigError: the crawl cannot start at all (fatal)
//
// Per-task errors never leave the worker that hit them. Only ConfigError
// reaches main().
// =============================================================================

use thiserror::Error;

/// Why a page could not be fetched.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The URL is not an absolute http(s) URL (raw relative hrefs end up here)
    #[error("invalid URL '{0}'")]
    InvalidUrl(String),

    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    /// The server answered with a non-success status code
    #[error("HTTP {0}")]
    Status(u16),

    #[error("unsupported content type '{0}'")]
    UnsupportedContentType(String),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The crawl was cancelled while the request was in flight
    #[error("cancelled")]
    Cancelled,
}

/// Why a fetched body could not be turned into links.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("content is not markup")]
    NotMarkup,

    #[error("content is binary")]
    BinaryContent,
}

/// Problems with the crawl configuration. These stop the process before any
/// worker is spawned.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("a seed URL is required (use --url)")]
    MissingSeed,

    #[error("invalid seed URL '{url}': {source}")]
    InvalidSeed {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("seed URL '{0}' must use http or https")]
    UnsupportedScheme(String),

    #[error("worker count must be greater than 0")]
    ZeroWorkers,

    #[error("fetch timeout must be greater than 0 seconds")]
    ZeroTimeout,
}

/// Why a task was dropped by a worker.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
