// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the CLI is a plain struct, and clap generates the
// parsing, --help and --version output from the field attributes.
//
// Only parsing happens here. Validation (is the seed a real URL? is the worker
// count positive?) lives in config.rs so it can be tested without clap.
// =============================================================================

use clap::Parser;

use crate::config::{DEFAULT_MAX_DEPTH, DEFAULT_TIMEOUT_SECS, DEFAULT_WORKERS};

#[derive(Parser, Debug)]
#[command(
    name = "link-spider",
    version = "0.1.0",
    about = "Crawl a website up to a fixed link depth with a bounded worker pool",
    long_about = "link-spider starts from a seed URL, fetches pages with a fixed number of \
                  concurrent workers, and follows every link it finds until the depth limit \
                  is reached or no new links remain."
)]
pub struct Cli {
    /// The start URL to crawl (e.g., https://example.com)
    ///
    /// Required. Missing it prints usage and exits with a non-zero status.
    #[arg(long)]
    pub url: String,

    /// Maximum crawl depth
    ///
    /// The seed page is depth 0, pages it links to are depth 1, and so on.
    /// Links that would land deeper than this are never fetched.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub depth: usize,

    /// Number of concurrent workers
    #[arg(long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Output the crawl report in JSON format instead of a table
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging (RUST_LOG takes precedence when set)
    #[arg(short, long)]
    pub verbose: bool,
}


// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why is `url` a String and not a url::Url?
//    - The visited set compares raw strings, and the seed has to match links
//      exactly as pages write them. Parsing would normalize it (e.g. add a
//      trailing slash), so we only validate it in config.rs and keep the text.
//
// 2. Why usize for depth and workers?
//    - Both are counts; a negative value is rejected by clap before we ever
//      see it.
// -----------------------------------------------------------------------------
