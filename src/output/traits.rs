//! Reporter trait and line formats

/// Receives the user-facing results of a scan
///
/// Workers call [`Reporter::page_counted`] concurrently, so implementations
/// must be thread safe.
pub trait Reporter: Send + Sync {
    /// Called once for every page that was fetched and scanned
    fn page_counted(&self, url: &str, count: usize);

    /// Called once with the final aggregate
    fn total(&self, total: usize);
}

/// Formats the per-page result line
pub fn format_count_line(url: &str, count: usize) -> String {
    format!("Count for {}: {}", url, count)
}

/// Formats the final total line
pub fn format_total_line(total: usize) -> String {
    format!("Total: {}", total)
}
