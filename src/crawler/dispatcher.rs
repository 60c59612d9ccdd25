//! Dispatcher - fan-out of count workers and fan-in of their results
//!
//! The dispatcher owns a single coordination loop that waits on two sources
//! at once:
//! - the input stream, where every task spawns one worker immediately
//! - the results stream, where every partial count is folded into the total
//!
//! When the input stream closes the loop moves to draining and starts waiting
//! on the set of outstanding workers as well. Once that set is empty it drops
//! the last results sender, which closes the results stream and lets the loop
//! deliver the aggregate. Draining therefore completes on worker completion,
//! not on result arrival, so failed fetches that never send a result cannot
//! stall shutdown.

use crate::config::Config;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::worker::{CountWorker, PartialResult, Task};
use crate::output::Reporter;
use crate::state::DispatchState;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::{JoinError, JoinHandle, JoinSet};

/// Final result of a scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Aggregate {
    /// Sum of every partial count received
    pub total: usize,

    /// Number of pages that were fetched and scanned
    pub pages_counted: usize,

    /// Number of workers spawned
    pub tasks_dispatched: usize,
}

impl Aggregate {
    fn record(&mut self, result: &PartialResult) {
        self.total += result.count;
        self.pages_counted += 1;
    }

    /// Number of dispatched tasks that produced no count
    pub fn failed(&self) -> usize {
        self.tasks_dispatched.saturating_sub(self.pages_counted)
    }
}

/// Coordinates count workers for one scan
pub struct Dispatcher {
    worker: CountWorker,
    state: DispatchState,
}

impl Dispatcher {
    /// Creates a dispatcher with no bound on concurrent fetches
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Shared fetcher used by every worker
    /// * `pattern` - Substring to count in each page
    /// * `reporter` - Receives one line per counted page
    pub fn new(
        fetcher: Arc<Fetcher>,
        pattern: impl Into<Arc<str>>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            worker: CountWorker::new(fetcher, pattern.into(), reporter),
            state: DispatchState::Receiving,
        }
    }

    /// Creates a dispatcher from the search and dispatcher sections of `config`
    pub fn from_config(config: &Config, fetcher: Arc<Fetcher>, reporter: Arc<dyn Reporter>) -> Self {
        Self::new(fetcher, config.search.pattern.as_str(), reporter)
            .with_max_workers(config.dispatcher.max_workers)
    }

    /// Limits how many workers may fetch at the same time
    ///
    /// Workers are still spawned as soon as their task arrives; past the
    /// limit they wait for a permit before fetching.
    pub fn with_max_workers(mut self, max_workers: Option<usize>) -> Self {
        if let Some(max) = max_workers {
            let limiter = Arc::new(Semaphore::new(max));
            self.worker = self.worker.with_limiter(limiter);
        }
        self
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    fn transition(&mut self, next: DispatchState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid dispatcher transition {} -> {}",
            self.state,
            next
        );
        tracing::debug!("Dispatcher {} -> {}", self.state, next);
        self.state = next;
    }

    /// Runs the coordination loop until every task has been processed
    ///
    /// Returns once the input stream is closed and every spawned worker has
    /// completed. The aggregate is only ever touched by this loop.
    pub async fn run(self, tasks: mpsc::Receiver<Task>) -> Aggregate {
        self.run_until(tasks, std::future::pending())
            .await
            .unwrap_or_default()
    }

    /// Runs the coordination loop, stopping early if `shutdown` completes
    ///
    /// On shutdown every outstanding worker is aborted and awaited before
    /// this returns, so no worker reports anything afterwards.
    ///
    /// # Returns
    ///
    /// * `Some(Aggregate)` - Input closed and every worker reported
    /// * `None` - `shutdown` fired first
    pub async fn run_until<F>(mut self, mut tasks: mpsc::Receiver<Task>, shutdown: F) -> Option<Aggregate>
    where
        F: Future<Output = ()>,
    {
        let (results_tx, mut results_rx) = mpsc::unbounded_channel::<PartialResult>();
        // Held until every worker has finished so the results stream cannot close early
        let mut results_tx = Some(results_tx);
        let mut workers = JoinSet::new();
        let mut aggregate = Aggregate::default();
        tokio::pin!(shutdown);

        tracing::debug!("Dispatcher started with pattern {:?}", self.worker.pattern());

        while !self.state.is_terminal() {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::warn!(
                        "Dispatcher shutting down with {} workers outstanding",
                        workers.len()
                    );
                    workers.shutdown().await;
                    return None;
                }

                task = tasks.recv(), if self.state.accepts_tasks() => match task {
                    Some(task) => {
                        if let Some(tx) = &results_tx {
                            tracing::debug!("Spawning worker for {}", task.url());
                            workers.spawn(self.worker.clone().run(task, tx.clone()));
                            aggregate.tasks_dispatched += 1;
                        }

                        // Reap finished workers so the set only holds live ones
                        while let Some(joined) = workers.try_join_next() {
                            log_worker_exit(joined);
                        }
                    }
                    None => {
                        self.transition(DispatchState::Draining);
                        tracing::debug!(
                            "Input closed after {} tasks, waiting on {} workers",
                            aggregate.tasks_dispatched,
                            workers.len()
                        );
                    }
                },

                joined = workers.join_next(), if self.state == DispatchState::Draining && results_tx.is_some() => match joined {
                    Some(joined) => log_worker_exit(joined),
                    // Every worker is done: dropping the last sender closes the results stream
                    None => drop(results_tx.take()),
                },

                result = results_rx.recv() => match result {
                    Some(result) => aggregate.record(&result),
                    None => self.transition(DispatchState::Done),
                },
            }
        }

        tracing::info!(
            "Scan complete: {} tasks, {} counted, {} failed, total {}",
            aggregate.tasks_dispatched,
            aggregate.pages_counted,
            aggregate.failed(),
            aggregate.total
        );

        Some(aggregate)
    }
}

fn log_worker_exit(joined: Result<(), JoinError>) {
    if let Err(e) = joined {
        tracing::error!("Count worker did not finish cleanly: {}", e);
    }
}

/// Starts `dispatcher` on the runtime and returns its input stream
///
/// The input stream buffers up to `capacity` tasks; senders wait when it is
/// full. Dropping every sender closes the input and starts draining.
///
/// # Example
///
/// ```no_run
/// use page_tally::crawler::{spawn_dispatcher, Dispatcher, Fetcher, Task};
/// use page_tally::config::FetcherConfig;
/// use page_tally::output::ConsoleReporter;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let fetcher = Arc::new(Fetcher::from_config(&FetcherConfig::default())?);
/// let dispatcher = Dispatcher::new(fetcher, "Go", Arc::new(ConsoleReporter));
/// let (tasks, handle) = spawn_dispatcher(dispatcher, 5);
///
/// tasks.send(Task::parse("https://go.dev/")?).await?;
/// drop(tasks);
///
/// let aggregate = handle.await?;
/// println!("Total: {}", aggregate.total);
/// # Ok(())
/// # }
/// ```
pub fn spawn_dispatcher(
    dispatcher: Dispatcher,
    capacity: usize,
) -> (mpsc::Sender<Task>, JoinHandle<Aggregate>) {
    let (tasks_tx, tasks_rx) = mpsc::channel(capacity);
    let handle = tokio::spawn(dispatcher.run(tasks_rx));
    (tasks_tx, handle)
}
