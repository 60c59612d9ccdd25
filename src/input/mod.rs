//! Input feeding for the dispatcher
//!
//! Reads one URL per line, drops lines that are not absolute URIs, and pushes
//! the rest into the dispatcher's input stream.

use crate::crawler::Task;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

/// Counters describing what happened to the input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputStats {
    pub lines_read: usize,
    pub accepted: usize,
    pub skipped: usize,
}

/// Sends every valid line of `reader` to `tasks`
///
/// Invalid lines are logged as `[<line>] <error>` and skipped. Sending waits
/// while the input stream is full, which throttles reading to the pace of the
/// dispatcher. `tasks` is dropped on return, closing the input stream.
///
/// # Returns
///
/// * `Ok(InputStats)` - End of input was reached
/// * `Err(io::Error)` - The input could not be read
pub async fn feed_tasks<R>(reader: R, tasks: mpsc::Sender<Task>) -> std::io::Result<InputStats>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut stats = InputStats::default();

    while let Some(line) = lines.next_line().await? {
        stats.lines_read += 1;

        let task = match Task::parse(&line) {
            Ok(task) => task,
            Err(e) => {
                tracing::warn!("[{}] {}", line, e);
                stats.skipped += 1;
                continue;
            }
        };

        if tasks.send(task).await.is_err() {
            tracing::warn!("Dispatcher stopped accepting tasks, ignoring remaining input");
            break;
        }
        stats.accepted += 1;
    }

    Ok(stats)
}
