// src/crawl/mod.rs
// =============================================================================
// This module runs a crawl.
//
//   Dispatcher --tasks--> Worker pool --outcomes--> Dispatcher --tasks--> ...
//
// Submodules:
// - task:       the messages (CrawlTask, ResultBatch, TaskOutcome)
// - worker:     fetch + extract, one task at a time
// - dispatcher: visited set, depth assignment, termination detection
// - report:     the result handed back to main
//
// Crawler::run wires the three channels, spawns the pool, runs the dispatcher
// loop on the current task, and waits for every worker before returning.
// =============================================================================

mod dispatcher;
mod report;
mod task;
mod worker;

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::error;

use crate::config::CrawlConfig;
use crate::fetch::{Fetcher, LinkExtractor};

pub use dispatcher::Dispatcher;
pub use report::{CrawlReport, PageRecord};
pub use worker::Worker;

pub struct Crawler {
    config: CrawlConfig,
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn LinkExtractor>,
}

impl Crawler {
    pub fn new(
        config: CrawlConfig,
        fetcher: Arc<dyn Fetcher>,
        extractor: Arc<dyn LinkExtractor>,
    ) -> Self {
        Self {
            config,
            fetcher,
            extractor,
        }
    }

    /// Crawls from the configured seed until the frontier is exhausted or
    /// `cancel` fires.
    pub async fn run(&self, cancel: CancellationToken) -> CrawlReport {
        let (task_tx, task_rx) = mpsc::channel(self.config.task_capacity());
        let (result_tx, result_rx) = mpsc::channel(self.config.results_capacity());
        let (done_tx, done_rx) = mpsc::channel(self.config.workers);
        let task_rx = Arc::new(Mutex::new(task_rx));

        // Workers get a child token so they can be stopped without cancelling
        // the caller's token.
        let worker_cancel = cancel.child_token();

        let handles: Vec<_> = (0..self.config.workers)
            .map(|id| {
                let worker = Worker {
                    id,
                    fetcher: Arc::clone(&self.fetcher),
                    extractor: Arc::clone(&self.extractor),
                    tasks: Arc::clone(&task_rx),
                    results: result_tx.clone(),
                    done: done_tx.clone(),
                    cancel: worker_cancel.clone(),
                };
                tokio::spawn(worker.run())
            })
            .collect();

        // Only workers may hold these, or the channels never close.
        drop(result_tx);
        drop(done_tx);
        drop(task_rx);

        let report = Dispatcher::new(&self.config)
            .run(task_tx, result_rx, done_rx, cancel)
            .await;

        // Normally every worker has already exited. This only matters if the
        // dispatcher gave up early.
        worker_cancel.cancel();
        for result in join_all(handles).await {
            if let Err(e) = result {
                error!(error = %e, "worker task failed");
            }
        }

        report
    }
}
