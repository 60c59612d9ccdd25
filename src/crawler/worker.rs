//! Count worker: fetch one page, count one pattern, report one result

use crate::crawler::fetcher::Fetcher;
use crate::output::Reporter;
use crate::url::parse_request_url;
use crate::UrlResult;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};

/// A single URL awaiting fetch-and-count processing
///
/// The original text is kept verbatim so output lines match the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    url: String,
}

impl Task {
    /// Builds a task from an input line, rejecting anything that is not an absolute URI
    pub fn parse(line: &str) -> UrlResult<Self> {
        parse_request_url(line)?;
        Ok(Self {
            url: line.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// The occurrence count produced for one task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialResult {
    pub url: String,
    pub count: usize,
}

/// Counts non-overlapping, case-sensitive occurrences of `pattern` in `text`
///
/// The scan runs left to right and resumes after each match, so `"aa"` occurs
/// twice in `"aaaa"`, not three times. An empty pattern never matches.
///
/// ```
/// use page_tally::crawler::count_occurrences;
///
/// assert_eq!(count_occurrences("go gogo GoGo", "Go"), 2);
/// assert_eq!(count_occurrences("aaaa", "aa"), 2);
/// ```
pub fn count_occurrences(text: &str, pattern: &str) -> usize {
    if pattern.is_empty() {
        return 0;
    }
    text.matches(pattern).count()
}

/// Everything a worker needs, cloned once per spawned task
#[derive(Clone)]
pub struct CountWorker {
    fetcher: Arc<Fetcher>,
    pattern: Arc<str>,
    reporter: Arc<dyn Reporter>,
    limiter: Option<Arc<Semaphore>>,
}

impl CountWorker {
    pub fn new(fetcher: Arc<Fetcher>, pattern: Arc<str>, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            fetcher,
            pattern,
            reporter,
            limiter: None,
        }
    }

    /// Caps the number of fetches in flight across every clone of this worker
    pub fn with_limiter(mut self, limiter: Arc<Semaphore>) -> Self {
        self.limiter = Some(limiter);
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Processes one task to completion
    ///
    /// A failed fetch ends the worker without sending anything; the fetcher
    /// has already logged why. Completion itself is observed by whoever owns
    /// the task handle, so returning from here on any path is the done signal.
    pub async fn run(self, task: Task, results: mpsc::UnboundedSender<PartialResult>) {
        let _permit = match &self.limiter {
            Some(limiter) => match limiter.clone().acquire_owned().await {
                Ok(permit) => Some(permit),
                Err(_) => {
                    tracing::debug!("Worker limiter closed, dropping {}", task.url());
                    return;
                }
            },
            None => None,
        };

        let body = match self.fetcher.fetch(task.url()).await {
            Ok(body) => body,
            Err(_) => return,
        };

        let count = count_occurrences(&body, &self.pattern);
        self.reporter.page_counted(task.url(), count);

        let result = PartialResult {
            url: task.url,
            count,
        };
        if let Err(e) = results.send(result) {
            tracing::debug!("Results stream closed before {} was recorded", e.0.url);
        }
    }
}
