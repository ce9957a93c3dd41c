//! One-shot notifications shown on a user's next page view.

use roster_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

pub const LEVEL_SUCCESS: &str = "success";

/// A row from the `flash_messages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FlashMessage {
    pub id: DbId,
    #[serde(skip)]
    pub user_id: DbId,
    pub level: String,
    pub message: String,
    pub created_at: Timestamp,
}
