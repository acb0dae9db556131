// src/crawl/report.rs
// =============================================================================
// What a finished crawl hands back to the caller.
//
// `pages` is the visited set in the order URLs were accepted, so it doubles
// as the list of every task that was ever scheduled. `found_on` records the
// page each URL was first discovered on, which turns the list into the
// discovered link tree.
// =============================================================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub url: String,
    pub depth: usize,
    /// None for the seed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub found_on: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlReport {
    pub seed: String,
    pub max_depth: usize,
    pub workers: usize,
    /// Every scheduled URL, in scheduling order
    pub pages: Vec<PageRecord>,
    /// Tasks that were fetched and parsed
    pub fetched: usize,
    /// Tasks dropped on a fetch or parse failure
    pub dropped: usize,
    /// Raw hrefs received from workers, duplicates included
    pub links_seen: usize,
    /// The crawl was stopped before the frontier was exhausted
    pub cancelled: bool,
}

#[cfg(test)]
impl CrawlReport {
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().map(|p| p.url.as_str())
    }

    pub fn page(&self, url: &str) -> Option<&PageRecord> {
        self.pages.iter().find(|p| p.url == url)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.page(url).is_some()
    }
}
