// src/config.rs
// =============================================================================
// Validated crawl configuration.
//
// The CLI layer (cli.rs) only knows about strings and numbers. Everything the
// crawler needs is checked here once, before any task is spawned, so the
// crawl itself never has to deal with a bad seed or an empty worker pool.
// =============================================================================

use std::time::Duration;

use url::Url;

use crate::cli::Cli;
use crate::error::ConfigError;

pub const DEFAULT_MAX_DEPTH: usize = 2;
pub const DEFAULT_WORKERS: usize = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// The first URL crawled, at depth 0
    pub seed: String,
    /// Links deeper than this are never scheduled
    pub max_depth: usize,
    /// Size of the worker pool
    pub workers: usize,
    /// Per-request timeout handed to the HTTP fetcher
    pub fetch_timeout: Duration,
}

impl CrawlConfig {
    /// Builds a config, validating every field.
    ///
    /// The seed is kept exactly as the user typed it: the visited set works
    /// on raw strings, so rewriting it here would let the seed be crawled
    /// twice when a page links back to it verbatim.
    pub fn new(
        seed: &str,
        max_depth: usize,
        workers: usize,
        fetch_timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let seed = seed.trim();
        if seed.is_empty() {
            return Err(ConfigError::MissingSeed);
        }

        let parsed = Url::parse(seed).map_err(|source| ConfigError::InvalidSeed {
            url: seed.to_string(),
            source,
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(seed.to_string()));
        }

        if workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if fetch_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(Self {
            seed: seed.to_string(),
            max_depth,
            workers,
            fetch_timeout,
        })
    }

    /// Capacity of the task channel. One slot per worker keeps the
    /// dispatcher from running far ahead of the pool.
    pub fn task_capacity(&self) -> usize {
        self.workers
    }

    /// Capacity of the results channel.
    pub fn results_capacity(&self) -> usize {
        self.workers
    }
}

impl TryFrom<&Cli> for CrawlConfig {
    type Error = ConfigError;

    fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
        CrawlConfig::new(
            &cli.url,
            cli.depth,
            cli.workers,
            Duration::from_secs(cli.timeout),
        )
    }
}
