//! Crawler module for fetching pages and tallying matches
//!
//! This module contains the core scanning logic, including:
//! - HTTP fetching through a single shared client
//! - Per-page substring counting in independent workers
//! - Fan-out/fan-in coordination and ordered shutdown

mod dispatcher;
mod fetcher;
mod worker;

pub use dispatcher::{spawn_dispatcher, Aggregate, Dispatcher};
pub use fetcher::{build_http_client, Fetcher};
pub use worker::{count_occurrences, CountWorker, PartialResult, Task};

use crate::config::Config;
use crate::input::feed_tasks;
use crate::output::Reporter;
use crate::TallyError;
use std::sync::Arc;
use tokio::io::AsyncBufRead;
use tokio::sync::{mpsc, oneshot};

/// Runs a complete scan over every URL read from `reader`
///
/// This is the main entry point. It will:
/// 1. Build the shared HTTP client
/// 2. Start the dispatcher
/// 3. Feed it every valid line from `reader`, skipping invalid ones
/// 4. Close the input and wait for every worker to report
/// 5. Report the total
///
/// # Returns
///
/// * `Ok(Aggregate)` - Scan finished; failed fetches are simply not counted
/// * `Err(TallyError)` - The client could not be built or the input could not be read
///
/// # Example
///
/// ```no_run
/// use page_tally::config::Config;
/// use page_tally::crawler::run_scan;
/// use page_tally::output::ConsoleReporter;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let input = tokio::io::BufReader::new(tokio::io::stdin());
/// let aggregate = run_scan(&Config::default(), input, Arc::new(ConsoleReporter)).await?;
/// assert!(aggregate.pages_counted <= aggregate.tasks_dispatched);
/// # Ok(())
/// # }
/// ```
pub async fn run_scan<R>(
    config: &Config,
    reader: R,
    reporter: Arc<dyn Reporter>,
) -> Result<Aggregate, TallyError>
where
    R: AsyncBufRead + Unpin,
{
    let fetcher = Arc::new(Fetcher::from_config(&config.fetcher)?);
    let dispatcher = Dispatcher::from_config(config, fetcher, reporter.clone());
    let (tasks, tasks_rx) = mpsc::channel(config.dispatcher.input_capacity);
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let handle = tokio::spawn(dispatcher.run_until(tasks_rx, async move {
        // Only an explicit stop ends the scan early, not a dropped sender
        if stop_rx.await.is_err() {
            std::future::pending::<()>().await;
        }
    }));

    // `feed_tasks` owns the sender, so the input stream is closed when it returns
    let stats = match feed_tasks(reader, tasks).await {
        Ok(stats) => stats,
        Err(e) => {
            // Wait for the dispatcher to abort its workers so nothing is reported after we return
            let _ = stop_tx.send(());
            let _ = handle.await;
            return Err(e.into());
        }
    };

    tracing::debug!(
        "Input exhausted: {} lines, {} accepted, {} skipped",
        stats.lines_read,
        stats.accepted,
        stats.skipped
    );

    let aggregate = handle
        .await
        .map_err(|e| TallyError::Dispatcher(e.to_string()))?
        .ok_or_else(|| TallyError::Dispatcher("dispatcher was stopped".to_string()))?;

    reporter.total(aggregate.total);
    Ok(aggregate)
}
