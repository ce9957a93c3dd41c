//! Page-number pagination.
//!
//! Pages are 1-based. An empty result still has one (empty) page, any other
//! page outside `1..=num_pages` is rejected with [`CoreError::InvalidPage`].

use serde::Serialize;

use crate::error::CoreError;

/// Number of persons shown per listing page.
pub const PERSONS_PER_PAGE: i64 = 2;

/// A resolved page within a result set of known size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub number: i64,
    pub num_pages: i64,
    pub per_page: i64,
    pub total: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl PageWindow {
    /// Resolve the requested page (raw query value) against `total` rows.
    ///
    /// `None` or an empty string means page 1. The literal `"last"` selects
    /// the final page.
    pub fn resolve(requested: Option<&str>, total: i64, per_page: i64) -> Result<Self, CoreError> {
        let per_page = per_page.max(1);
        let total = total.max(0);
        let num_pages = if total == 0 {
            1
        } else {
            (total + per_page - 1) / per_page
        };

        let number = match requested.map(str::trim) {
            None | Some("") => 1,
            Some("last") => num_pages,
            Some(raw) => raw.parse::<i64>().map_err(|_| {
                CoreError::InvalidPage("That page number is not an integer".into())
            })?,
        };

        if number < 1 {
            return Err(CoreError::InvalidPage(
                "That page number is less than 1".into(),
            ));
        }
        if number > num_pages {
            return Err(CoreError::InvalidPage(
                "That page contains no results".into(),
            ));
        }

        Ok(Self {
            number,
            num_pages,
            per_page,
            total,
            has_next: number < num_pages,
            has_previous: number > 1,
        })
    }

    /// SQL `LIMIT` for this page.
    pub fn limit(&self) -> i64 {
        self.per_page
    }

    /// SQL `OFFSET` for this page.
    pub fn offset(&self) -> i64 {
        (self.number - 1) * self.per_page
    }
}
