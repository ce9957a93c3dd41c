//! Image upload rules: form-set caps, content sniffing and primary selection.

use std::io::Cursor;

use image::{ImageFormat, ImageReader};

use crate::types::DbId;

/// Maximum number of image entries accepted per person submission.
pub const MAX_IMAGE_FORMS: usize = 5;

/// Maximum number of inline image rows in the staff admin.
pub const ADMIN_INLINE_IMAGE_MAX: usize = 3;

/// Default maximum size of a single uploaded image (5 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

pub const INVALID_IMAGE_MESSAGE: &str =
    "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";
pub const EMPTY_FILE_MESSAGE: &str = "The submitted file is empty.";

/// Accepted image encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
    WebP,
}

impl ImageKind {
    /// File extension used when storing an image of this kind.
    pub fn extension(self) -> &'static str {
        match self {
            ImageKind::Png => "png",
            ImageKind::Jpeg => "jpg",
            ImageKind::WebP => "webp",
        }
    }
}

/// Header-level facts about an uploaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub kind: ImageKind,
    pub width: u32,
    pub height: u32,
}

/// Sniff and validate uploaded bytes, returning a form error message on rejection.
///
/// Only the header is decoded, which is enough to reject non-images and
/// truncated files without paying for a full decode.
pub fn inspect_image(bytes: &[u8], max_bytes: usize) -> Result<ImageInfo, String> {
    if bytes.is_empty() {
        return Err(EMPTY_FILE_MESSAGE.to_string());
    }
    if bytes.len() > max_bytes {
        return Err(format!(
            "Ensure this file is at most {max_bytes} bytes (it is {}).",
            bytes.len()
        ));
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|_| INVALID_IMAGE_MESSAGE.to_string())?;

    let kind = match reader.format() {
        Some(ImageFormat::Png) => ImageKind::Png,
        Some(ImageFormat::Jpeg) => ImageKind::Jpeg,
        Some(ImageFormat::WebP) => ImageKind::WebP,
        _ => return Err(INVALID_IMAGE_MESSAGE.to_string()),
    };

    let (width, height) = reader
        .into_dimensions()
        .map_err(|_| INVALID_IMAGE_MESSAGE.to_string())?;

    Ok(ImageInfo {
        kind,
        width,
        height,
    })
}

/// Split a person's images into the primary (lowest id) and the remaining gallery.
///
/// The gallery keeps ascending id order.
pub fn split_primary<T>(mut images: Vec<T>, id_of: impl Fn(&T) -> DbId) -> (Option<T>, Vec<T>) {
    images.sort_by_key(|img| id_of(img));
    if images.is_empty() {
        return (None, images);
    }
    let primary = images.remove(0);
    (Some(primary), images)
}
