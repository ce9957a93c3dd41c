//! Home-page listing modes: everything, a text search, or recently created.

use chrono::Duration;

use crate::forms::has_null_characters;
use crate::types::Timestamp;

/// Window used by the "new" filter.
pub const RECENT_WINDOW_HOURS: i64 = 24;

/// Which subset of persons the home page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingMode {
    All,
    /// Case-insensitive substring match on contact or description.
    Search(String),
    /// Created within the last [`RECENT_WINDOW_HOURS`].
    Recent,
}

impl ListingMode {
    /// Pick the mode from the raw `q` and `filter` query values.
    ///
    /// Empty strings count as absent. A search takes precedence over the filter.
    pub fn from_params(q: Option<&str>, filter: Option<&str>) -> Self {
        match (q, filter) {
            (Some(term), _) if !term.is_empty() => ListingMode::Search(term.to_string()),
            (_, Some(flag)) if !flag.is_empty() => ListingMode::Recent,
            _ => ListingMode::All,
        }
    }

    /// `false` when no stored person can match, so the query can be skipped.
    ///
    /// Stored text never contains NUL, and the database refuses it as a
    /// pattern.
    pub fn can_match(&self) -> bool {
        match self {
            ListingMode::Search(term) => !has_null_characters(term),
            ListingMode::All | ListingMode::Recent => true,
        }
    }

    /// Name of the template the page is rendered with.
    pub fn template(&self) -> &'static str {
        match self {
            ListingMode::All => "index",
            ListingMode::Search(_) => "search",
            ListingMode::Recent => "new",
        }
    }
}

/// Earliest `created` timestamp that still counts as recent at `now`.
pub fn recent_cutoff(now: Timestamp) -> Timestamp {
    now - Duration::hours(RECENT_WINDOW_HOURS)
}

/// Build an `ILIKE` pattern matching `term` as a literal substring.
///
/// Escapes `\`, `%` and `_` so user input never acts as a wildcard.
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
