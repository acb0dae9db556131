// src/crawl/dispatcher.rs
// =============================================================================
// The dispatcher: frontier, visited set and termination detection.
//
// It is the only code that decides whether a link is new and what depth it
// gets, and the only code that touches the visited set. Since it runs as a
// single loop and nothing else can reach its state, no lock is needed.
//
// How one loop iteration works (one tokio::select! over):
// - cancellation            -> stop scheduling, start draining
// - a worker's TaskOutcome  -> dedup links, assign depth, buffer new tasks
// - a completion signal     -> one less worker alive
// - a free task slot        -> hand the oldest buffered task to the pool
//
// New tasks go into the `pending` buffer first and are only sent when the
// task channel has room. Results are therefore always being received, and the
// dispatcher can never sit blocked on a full task channel while workers sit
// blocked on a full results channel.
//
// Termination:
//   RUNNING  -> DRAINING  when pending is empty and no task is in flight
//                         (or on cancellation); the task channel is closed
//   DRAINING -> DONE      when every worker has sent its completion signal
// =============================================================================

use std::collections::{HashSet, VecDeque};

use tokio::sync::mpsc::{self, Permit};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::report::{CrawlReport, PageRecord};
use super::task::{CrawlTask, ResultBatch, TaskOutcome};
use crate::config::CrawlConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlState {
    Running,
    Draining,
    Done,
}

pub struct Dispatcher {
    max_depth: usize,
    workers: usize,
    visited: HashSet<String>,
    pending: VecDeque<CrawlTask>,
    /// Tasks handed to the pool whose outcome has not come back yet
    in_flight: usize,
    state: CrawlState,
    report: CrawlReport,
}

impl Dispatcher {
    /// Creates a dispatcher whose frontier holds only the seed task.
    pub fn new(config: &CrawlConfig) -> Self {
        let mut dispatcher = Self {
            max_depth: config.max_depth,
            workers: config.workers,
            visited: HashSet::new(),
            pending: VecDeque::new(),
            in_flight: 0,
            state: CrawlState::Running,
            report: CrawlReport {
                seed: config.seed.clone(),
                max_depth: config.max_depth,
                workers: config.workers,
                ..CrawlReport::default()
            },
        };
        dispatcher.schedule(CrawlTask::seed(config.seed.clone()), None);
        dispatcher
    }

    /// Runs the control loop until every worker has exited.
    pub async fn run(
        mut self,
        tasks: mpsc::Sender<CrawlTask>,
        mut results: mpsc::Receiver<TaskOutcome>,
        mut done: mpsc::Receiver<usize>,
        cancel: CancellationToken,
    ) -> CrawlReport {
        // Dropping the sender is what closes the task channel.
        let mut tasks = Some(tasks);
        let mut alive = self.workers;

        info!(seed = %self.report.seed, max_depth = self.max_depth, workers = self.workers, "crawl started");

        loop {
            if self.state == CrawlState::Running && self.frontier_exhausted() {
                info!(pages = self.report.pages.len(), "frontier exhausted, closing task channel");
                self.state = CrawlState::Draining;
            }
            if self.state != CrawlState::Running {
                tasks.take();
            }

            if alive == 0 {
                break;
            }

            tokio::select! {
                biased;

                _ = cancel.cancelled(), if self.state == CrawlState::Running => {
                    warn!(
                        pending = self.pending.len(),
                        in_flight = self.in_flight,
                        "crawl cancelled, draining workers"
                    );
                    self.pending.clear();
                    self.state = CrawlState::Draining;
                    self.report.cancelled = true;
                }

                Some(outcome) = results.recv() => self.handle_outcome(outcome),

                signal = done.recv() => match signal {
                    Some(id) => {
                        alive -= 1;
                        debug!(worker = id, alive, "worker signalled completion");
                    }
                    None => {
                        // Every worker is gone but not all of them said so;
                        // one must have panicked. Nothing can arrive any more.
                        error!(alive, "workers exited without signalling completion");
                        self.report.cancelled = true;
                        break;
                    }
                },

                Some(permit) = reserve(&tasks), if !self.pending.is_empty() => {
                    self.dispatch(permit);
                }
            }
        }

        self.state = CrawlState::Done;
        info!(
            pages = self.report.pages.len(),
            fetched = self.report.fetched,
            dropped = self.report.dropped,
            "crawl finished"
        );
        self.report
    }

    /// Nothing buffered and nothing in flight: no worker can produce another
    /// link, so the frontier can never grow again.
    fn frontier_exhausted(&self) -> bool {
        self.pending.is_empty() && self.in_flight == 0
    }

    fn dispatch(&mut self, permit: Permit<'_, CrawlTask>) {
        if let Some(task) = self.pending.pop_front() {
            debug!(url = %task.url, depth = task.depth, "dispatching task");
            permit.send(task);
            self.in_flight += 1;
        }
    }

    fn handle_outcome(&mut self, outcome: TaskOutcome) {
        self.in_flight = self.in_flight.saturating_sub(1);

        match outcome {
            TaskOutcome::Discovered(batch) => {
                self.report.fetched += 1;
                self.report.links_seen += batch.links.len();
                // Late results after a cancel are counted but not followed.
                if self.state == CrawlState::Running {
                    self.accept_batch(batch);
                }
            }
            TaskOutcome::Dropped { .. } => {
                self.report.dropped += 1;
            }
        }
    }

    /// Filters one batch against the depth limit and the visited set, and
    /// buffers a task for every link that survives.
    fn accept_batch(&mut self, batch: ResultBatch) {
        let child_depth = batch.source_depth + 1;
        if child_depth > self.max_depth {
            debug!(url = %batch.source_url, links = batch.links.len(), "depth limit reached, links discarded");
            return;
        }

        for href in batch.links {
            if self.visited.contains(&href) {
                continue;
            }
            let task = CrawlTask {
                url: href,
                depth: child_depth,
            };
            self.schedule(task, Some(&batch.source_url));
        }
    }

    // A URL enters the visited set exactly when it becomes a task.
    fn schedule(&mut self, task: CrawlTask, found_on: Option<&str>) {
        self.visited.insert(task.url.clone());
        self.report.pages.push(PageRecord {
            url: task.url.clone(),
            depth: task.depth,
            found_on: found_on.map(str::to_string),
        });
        self.pending.push_back(task);
    }
}

// Waits for room in the task channel. Never resolves once the channel has
// been closed on our side.
async fn reserve(tasks: &Option<mpsc::Sender<CrawlTask>>) -> Option<Permit<'_, CrawlTask>> {
    match tasks {
        Some(tx) => tx.reserve().await.ok(),
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(max_depth: usize) -> CrawlConfig {
        CrawlConfig::new("http://site/a", max_depth, 2, Duration::from_secs(1)).unwrap()
    }

    fn batch(source: &str, depth: usize, links: &[&str]) -> ResultBatch {
        ResultBatch {
            source_url: source.to_string(),
            source_depth: depth,
            links: links.iter().map(|l| l.to_string()).collect(),
        }
    }

    fn pending_urls(d: &Dispatcher) -> Vec<(&str, usize)> {
        d.pending.iter().map(|t| (t.url.as_str(), t.depth)).collect()
    }

    #[test]
    fn test_seed_is_visited_at_depth_zero() {
        let d = Dispatcher::new(&config(2));
        assert_eq!(pending_urls(&d), vec![("http://site/a", 0)]);
        assert!(d.visited.contains("http://site/a"));
        assert_eq!(d.report.pages[0].found_on, None);
        assert_eq!(d.state, CrawlState::Running);
    }

    #[test]
    fn test_children_get_parent_depth_plus_one() {
        let mut d = Dispatcher::new(&config(3));
        d.pending.clear();
        d.accept_batch(batch("http://site/a", 1, &["http://site/b", "http://site/c"]));
        assert_eq!(pending_urls(&d), vec![("http://site/b", 2), ("http://site/c", 2)]);
        assert_eq!(d.report.page("http://site/b").unwrap().found_on.as_deref(), Some("http://site/a"));
    }

    #[test]
    fn test_duplicates_in_one_batch_are_scheduled_once() {
        let mut d = Dispatcher::new(&config(2));
        d.pending.clear();
        d.accept_batch(batch("http://site/a", 0, &["http://site/b", "http://site/b", "http://site/b"]));
        assert_eq!(pending_urls(&d), vec![("http://site/b", 1)]);
    }

    #[test]
    fn test_duplicates_across_batches_are_scheduled_once() {
        let mut d = Dispatcher::new(&config(2));
        d.pending.clear();
        d.accept_batch(batch("http://site/a", 0, &["http://site/x", "http://site/a"]));
        d.accept_batch(batch("http://site/y", 0, &["http://site/x", "http://site/z"]));
        assert_eq!(pending_urls(&d), vec![("http://site/x", 1), ("http://site/z", 1)]);
        assert_eq!(d.report.pages.len(), 3);
    }

    #[test]
    fn test_batch_beyond_max_depth_is_discarded() {
        let mut d = Dispatcher::new(&config(1));
        d.pending.clear();
        d.accept_batch(batch("http://site/b", 1, &["http://site/d"]));
        assert!(d.pending.is_empty());
        assert!(!d.visited.contains("http://site/d"));
    }

    #[test]
    fn test_outcomes_settle_in_flight_tasks() {
        let mut d = Dispatcher::new(&config(1));
        d.pending.clear();
        d.in_flight = 2;
        assert!(!d.frontier_exhausted());

        d.handle_outcome(TaskOutcome::Dropped {
            task: CrawlTask::seed("http://site/a"),
            reason: crate::error::FetchError::Status(500).into(),
        });
        d.handle_outcome(TaskOutcome::Discovered(batch("http://site/a", 1, &["http://site/q"])));

        assert_eq!(d.in_flight, 0);
        assert_eq!(d.report.dropped, 1);
        assert_eq!(d.report.fetched, 1);
        assert_eq!(d.report.links_seen, 1);
        assert!(d.frontier_exhausted());
    }

    #[test]
    fn test_results_after_cancel_are_not_followed() {
        let mut d = Dispatcher::new(&config(3));
        d.pending.clear();
        d.in_flight = 1;
        d.state = CrawlState::Draining;
        d.handle_outcome(TaskOutcome::Discovered(batch("http://site/a", 0, &["http://site/b"])));
        assert!(d.pending.is_empty());
        assert_eq!(d.report.fetched, 1);
    }
}
