//! Person entity model and DTOs.

use roster_core::permissions::Owned;
use roster_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A contact entry from the `persons` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Person {
    pub id: DbId,
    pub user_id: DbId,
    pub category_slug: String,
    pub name: String,
    pub contact: String,
    pub description: String,
    pub address: Option<String>,
    pub created: Timestamp,
    pub updated_at: Timestamp,
}

impl Owned for Person {
    fn owner_id(&self) -> DbId {
        self.user_id
    }
}

/// DTO for creating a person. The owner is always the submitting user.
#[derive(Debug, Clone)]
pub struct CreatePerson {
    pub user_id: DbId,
    pub category_slug: String,
    pub name: String,
    pub contact: String,
    pub description: String,
    pub address: Option<String>,
    pub created: Timestamp,
}

/// DTO for replacing a person's editable fields. The owner never changes.
#[derive(Debug, Clone)]
pub struct UpdatePerson {
    pub category_slug: String,
    pub name: String,
    pub contact: String,
    pub description: String,
    pub address: Option<String>,
    pub created: Timestamp,
}

/// Row selection for person listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonFilter {
    All,
    /// `ILIKE` pattern matched against contact OR description.
    Matching(String),
    CreatedSince(Timestamp),
    Category(String),
}
