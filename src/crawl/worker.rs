// src/crawl/worker.rs
// =============================================================================
// A crawl worker.
//
// Each worker loops:
// 1. Take the next task from the shared task channel
// 2. Fetch the page, then extract its links
// 3. Report the outcome (links, or the reason the task was dropped)
//
// When the task channel is closed and empty, or the crawl is cancelled, the
// worker sends its id on the completion channel once and exits. Workers keep
// nothing between tasks, so any worker can take any task.
// =============================================================================

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::task::{CrawlTask, ResultBatch, TaskOutcome};
use crate::error::{FetchError, TaskError};
use crate::fetch::{Fetcher, LinkExtractor};

/// tokio's mpsc has a single consumer, so the pool shares it behind a lock.
/// Only the worker holding the lock waits on the channel; the rest queue up on
/// the lock itself.
pub type SharedTaskReceiver = Arc<Mutex<mpsc::Receiver<CrawlTask>>>;

pub struct Worker {
    pub id: usize,
    pub fetcher: Arc<dyn Fetcher>,
    pub extractor: Arc<dyn LinkExtractor>,
    pub tasks: SharedTaskReceiver,
    pub results: mpsc::Sender<TaskOutcome>,
    pub done: mpsc::Sender<usize>,
    pub cancel: CancellationToken,
}

impl Worker {
    pub async fn run(self) {
        debug!(worker = self.id, "worker started");

        while let Some(task) = self.next_task().await {
            let outcome = match self.process(&task).await {
                Ok(links) => {
                    debug!(worker = self.id, url = %task.url, links = links.len(), "page crawled");
                    TaskOutcome::Discovered(ResultBatch {
                        source_url: task.url,
                        source_depth: task.depth,
                        links,
                    })
                }
                Err(reason) => {
                    warn!(worker = self.id, url = %task.url, error = %reason, "dropping task");
                    TaskOutcome::Dropped { task, reason }
                }
            };

            // The dispatcher only goes away once every worker has signalled,
            // so a closed channel means something already went wrong upstream.
            if self.results.send(outcome).await.is_err() {
                break;
            }
        }

        debug!(worker = self.id, "worker finished");
        let _ = self.done.send(self.id).await;
    }

    async fn next_task(&self) -> Option<CrawlTask> {
        let mut tasks = self.tasks.lock().await;
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            task = tasks.recv() => task,
        }
    }

    async fn process(&self, task: &CrawlTask) -> Result<Vec<String>, TaskError> {
        let body = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(FetchError::Cancelled.into()),
            body = self.fetcher.fetch(&task.url) => body?,
        };

        Ok(self.extractor.extract_links(&body)?)
    }
}
