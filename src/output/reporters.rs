use crate::output::traits::{format_count_line, format_total_line, Reporter};
use std::sync::Mutex;

/// Prints result lines to standard output
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn page_counted(&self, url: &str, count: usize) {
        println!("{}", format_count_line(url, count));
    }

    fn total(&self, total: usize) {
        println!("{}", format_total_line(total));
    }
}

/// Buffers result lines in memory, in the order they were reported
#[derive(Debug, Default)]
pub struct CollectingReporter {
    lines: Mutex<Vec<String>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every line reported so far
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn push(&self, line: String) {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(line);
    }
}

impl Reporter for CollectingReporter {
    fn page_counted(&self, url: &str, count: usize) {
        self.push(format_count_line(url, count));
    }

    fn total(&self, total: usize) {
        self.push(format_total_line(total));
    }
}
