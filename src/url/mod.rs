//! Input URL validation
//!
//! Every input line must parse as an absolute URI before it becomes a task.
//! No normalization happens here: the task keeps the text exactly as it was
//! read so output lines echo the user's input.

use crate::UrlError;
use url::Url;

/// Checks that `raw` is a syntactically valid absolute URI
///
/// # Examples
///
/// ```
/// use page_tally::url::parse_request_url;
///
/// assert!(parse_request_url("https://example.com/page").is_ok());
/// assert!(parse_request_url("not a url").is_err());
/// ```
pub fn parse_request_url(raw: &str) -> Result<Url, UrlError> {
    if raw.is_empty() {
        return Err(UrlError::Empty);
    }

    // `Url::parse` would silently strip this, but the task echoes the raw text
    if raw.trim() != raw {
        return Err(UrlError::SurroundingWhitespace);
    }

    Ok(Url::parse(raw)?)
}
