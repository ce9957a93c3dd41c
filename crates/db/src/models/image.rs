//! Image entity model and DTOs.

use roster_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `images` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Image {
    pub id: DbId,
    /// `None` until the image is attached to a person.
    pub person_id: Option<DbId>,
    /// Path relative to the media root.
    pub file_path: String,
    /// SHA-256 hex digest of the stored bytes.
    pub checksum: String,
    pub created_at: Timestamp,
}

/// A stored file ready to be recorded as an image row.
#[derive(Debug, Clone)]
pub struct NewImage {
    pub file_path: String,
    pub checksum: String,
}

/// One image entry of an update submission.
#[derive(Debug, Clone)]
pub struct ImageChange {
    /// Existing image whose file is replaced; `None` adds a new image.
    pub replaces: Option<DbId>,
    pub file: NewImage,
}
