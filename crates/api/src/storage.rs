//! Local media storage for uploaded images.
//!
//! Files live under the configured media root in an `images/` subdirectory
//! and are served back under [`MEDIA_URL_PREFIX`].

use std::path::{Component, Path, PathBuf};

use roster_core::images::ImageKind;
use roster_db::models::image::NewImage;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// URL prefix the media root is mounted at.
pub const MEDIA_URL_PREFIX: &str = "/media";

/// Subdirectory of the media root holding person images.
const IMAGE_DIR: &str = "images";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Media storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Refusing to touch path outside the media root: {0}")]
    InvalidPath(String),
}

/// Writes, removes and addresses files beneath a media root directory.
#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
}

impl MediaStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store image bytes under a fresh name, returning the relative path and checksum.
    pub async fn save_image(&self, bytes: &[u8], kind: ImageKind) -> Result<NewImage, StorageError> {
        let dir = self.root.join(IMAGE_DIR);
        tokio::fs::create_dir_all(&dir).await?;

        let file_name = format!("{}.{}", Uuid::new_v4().simple(), kind.extension());
        tokio::fs::write(dir.join(&file_name), bytes).await?;

        Ok(NewImage {
            file_path: format!("{IMAGE_DIR}/{file_name}"),
            checksum: checksum(bytes),
        })
    }

    /// Delete a stored file. A file that is already gone is not an error.
    pub async fn remove(&self, relative: &str) -> Result<(), StorageError> {
        let path = self.resolve(relative)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove several files, logging failures instead of returning them.
    ///
    /// Used after the database has already committed, when a leftover file is
    /// the lesser problem.
    pub async fn remove_all<S: AsRef<str>>(&self, relatives: &[S]) {
        for relative in relatives {
            if let Err(e) = self.remove(relative.as_ref()).await {
                tracing::warn!(path = relative.as_ref(), error = %e, "Failed to remove media file");
            }
        }
    }

    /// Public URL for a stored file.
    pub fn url(&self, relative: &str) -> String {
        format!("{MEDIA_URL_PREFIX}/{relative}")
    }

    /// Join `relative` onto the root, rejecting absolute paths and `..`.
    fn resolve(&self, relative: &str) -> Result<PathBuf, StorageError> {
        let candidate = Path::new(relative);
        let safe = candidate
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !safe || relative.is_empty() {
            return Err(StorageError::InvalidPath(relative.to_string()));
        }
        Ok(self.root.join(candidate))
    }
}

/// SHA-256 hex digest of `bytes`.
pub fn checksum(bytes: &[u8]) -> String {
    let hash = Sha256::digest(bytes);
    format!("{hash:x}")
}
