//! Category slug rules.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;
use crate::forms::{has_null_characters, NULL_CHARACTERS_MESSAGE};

/// Maximum length of a category slug.
pub const MAX_SLUG_LEN: usize = 100;

/// Maximum length of a category display name.
pub const MAX_CATEGORY_NAME_LEN: usize = 100;

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("slug regex is valid"));

/// Validate a category slug: lowercase ascii letters and digits separated by single dashes.
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.is_empty() || slug.len() > MAX_SLUG_LEN {
        return Err(CoreError::Validation(format!(
            "Slug must be between 1 and {MAX_SLUG_LEN} characters"
        )));
    }
    if !SLUG_RE.is_match(slug) {
        return Err(CoreError::Validation(format!(
            "Invalid slug '{slug}'. Use lowercase letters, digits and single dashes"
        )));
    }
    Ok(())
}

/// Validate a category display name.
pub fn validate_category_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if has_null_characters(trimmed) {
        return Err(CoreError::Validation(NULL_CHARACTERS_MESSAGE.into()));
    }
    if trimmed.is_empty() || trimmed.chars().count() > MAX_CATEGORY_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Category name must be between 1 and {MAX_CATEGORY_NAME_LEN} characters"
        )));
    }
    Ok(())
}
