//! Output module for reporting scan results
//!
//! Result lines (`Count for <url>: <n>` and `Total: <n>`) go through a
//! [`Reporter`] so the console binary and embedding code can share the same
//! dispatcher. Diagnostics are not reporter output; they go through `tracing`.

mod reporters;
mod traits;

pub use reporters::{CollectingReporter, ConsoleReporter};
pub use traits::{format_count_line, format_total_line, Reporter};
