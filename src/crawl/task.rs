// src/crawl/task.rs
// =============================================================================
// Messages passed between the dispatcher and the workers.
//
//   dispatcher --CrawlTask--> worker --TaskOutcome--> dispatcher
//
// Depth always travels with the message: a task carries its own depth, and a
// result batch carries the depth of the page it came from. The dispatcher
// never has to look a depth up.
// =============================================================================

use crate::error::TaskError;

/// One URL to fetch, at a known depth from the seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    pub url: String,
    pub depth: usize,
}

impl CrawlTask {
    pub fn seed(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            depth: 0,
        }
    }
}

/// Links found on one successfully fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultBatch {
    /// The page the links were found on
    pub source_url: String,
    /// Depth of that page; children get `source_depth + 1`
    pub source_depth: usize,
    /// Raw hrefs in extraction order
    pub links: Vec<String>,
}

/// What a worker reports back for every task it received.
///
/// Exactly one outcome is sent per task, which is what lets the dispatcher
/// know when nothing is left in flight.
#[derive(Debug)]
pub enum TaskOutcome {
    Discovered(ResultBatch),
    Dropped { task: CrawlTask, reason: TaskError },
}
