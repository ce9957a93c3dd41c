//! Binding of person submissions from `multipart/form-data` bodies.
//!
//! Text fields fill a [`PersonInput`]. The image form-set uses the field
//! names `images-<n>-image` (file) and `images-<n>-id` (existing image id).
//! Entries are ordered by `<n>`; indices at or beyond [`MAX_IMAGE_FORMS`] are
//! dropped.

use std::collections::BTreeMap;

use axum::body::Bytes;
use axum::extract::Multipart;
use roster_core::forms::{FormErrors, PersonInput, INVALID_CHOICE_MESSAGE};
use roster_core::images::{inspect_image, ImageKind, MAX_IMAGE_FORMS};
use roster_core::types::DbId;

use crate::error::{AppError, AppResult};

/// Prefix of every image form-set field.
pub const IMAGE_FORMSET_PREFIX: &str = "images";

/// Name of a form-set field, e.g. `images-2-image`.
pub fn image_field_name(index: usize, field: &str) -> String {
    format!("{IMAGE_FORMSET_PREFIX}-{index}-{field}")
}

/// A file part as received.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Bytes,
}

/// One entry of the image form-set.
#[derive(Debug, Clone, Default)]
pub struct ImageEntry {
    pub index: usize,
    /// Existing image this entry refers to (update only).
    pub id: Option<DbId>,
    pub file: Option<UploadedFile>,
}

impl ImageEntry {
    /// An entry with neither a file nor an id carries nothing to save.
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.file.is_none()
    }
}

/// Everything bound from a person form submission.
#[derive(Debug, Clone, Default)]
pub struct PersonSubmission {
    pub person: PersonInput,
    pub images: Vec<ImageEntry>,
    /// Problems found while binding (e.g. a non-numeric image id).
    pub errors: FormErrors,
}

/// Which part of a form-set entry a field fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImagePart {
    File,
    Id,
}

/// Split `images-<n>-image` / `images-<n>-id` into index and part.
fn parse_image_field(name: &str) -> Option<(usize, ImagePart)> {
    let rest = name.strip_prefix(IMAGE_FORMSET_PREFIX)?.strip_prefix('-')?;
    let (index, part) = rest.split_once('-')?;
    let index = index.parse().ok()?;
    let part = match part {
        "image" => ImagePart::File,
        "id" => ImagePart::Id,
        _ => return None,
    };
    Some((index, part))
}

/// Collects fields one at a time; kept separate from the multipart stream so
/// the binding rules are testable without an HTTP body.
#[derive(Debug, Default)]
struct SubmissionBuilder {
    person: PersonInput,
    entries: BTreeMap<usize, ImageEntry>,
    errors: FormErrors,
    dropped: usize,
}

impl SubmissionBuilder {
    fn text(&mut self, name: &str, value: String) {
        match name {
            "category" => self.person.category = value,
            "name" => self.person.name = value,
            "contact" => self.person.contact = value,
            "description" => self.person.description = value,
            "address" => self.person.address = value,
            "created" => self.person.created = value,
            _ => match parse_image_field(name) {
                Some((index, ImagePart::Id)) => self.image_id(index, &value),
                _ => tracing::debug!(field = name, "Ignoring unknown form field"),
            },
        }
    }

    fn image_id(&mut self, index: usize, raw: &str) {
        let raw = raw.trim();
        let parsed = if raw.is_empty() {
            None
        } else {
            match raw.parse::<DbId>() {
                Ok(id) => Some(id),
                Err(_) => {
                    if index < MAX_IMAGE_FORMS {
                        self.errors
                            .add(image_field_name(index, "id"), INVALID_CHOICE_MESSAGE);
                    }
                    None
                }
            }
        };
        if let Some(entry) = self.entry(index) {
            if parsed.is_some() {
                entry.id = parsed;
            }
        }
    }

    fn file(&mut self, index: usize, filename: String, bytes: Bytes) {
        let Some(entry) = self.entry(index) else {
            return;
        };
        // Browsers send an empty, unnamed part for an untouched file input.
        if filename.is_empty() && bytes.is_empty() {
            return;
        }
        entry.file = Some(UploadedFile { filename, bytes });
    }

    fn entry(&mut self, index: usize) -> Option<&mut ImageEntry> {
        if index >= MAX_IMAGE_FORMS {
            self.dropped += 1;
            return None;
        }
        Some(self.entries.entry(index).or_insert_with(|| ImageEntry {
            index,
            ..ImageEntry::default()
        }))
    }

    fn finish(self) -> PersonSubmission {
        if self.dropped > 0 {
            tracing::warn!(
                dropped_fields = self.dropped,
                max = MAX_IMAGE_FORMS,
                "Image form-set fields beyond the maximum were ignored",
            );
        }
        PersonSubmission {
            person: self.person,
            images: self
                .entries
                .into_values()
                .filter(|entry| !entry.is_empty())
                .collect(),
            errors: self.errors,
        }
    }
}

/// Read a whole person submission from a multipart body.
pub async fn read_person_submission(mut multipart: Multipart) -> AppResult<PersonSubmission> {
    let mut builder = SubmissionBuilder::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match parse_image_field(&name) {
            Some((index, ImagePart::File)) => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read upload '{name}': {e}"))
                })?;
                builder.file(index, filename, bytes);
            }
            _ => {
                let value = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read field '{name}': {e}"))
                })?;
                builder.text(&name, value);
            }
        }
    }

    Ok(builder.finish())
}

/// An image entry that passed validation.
#[derive(Debug, Clone)]
pub struct ValidImage {
    /// Existing image whose file this replaces.
    pub replaces: Option<DbId>,
    pub kind: ImageKind,
    pub bytes: Bytes,
}

/// Validate bound image entries.
///
/// `existing` lists the ids an entry may refer to; empty on create. Entries
/// carrying only an id (no new file) leave that image untouched and are
/// dropped from the result.
pub fn validate_images(
    entries: &[ImageEntry],
    existing: &[DbId],
    max_bytes: usize,
) -> Result<Vec<ValidImage>, FormErrors> {
    let mut errors = FormErrors::new();
    let mut valid = Vec::new();

    for entry in entries {
        if let Some(id) = entry.id {
            if !existing.contains(&id) {
                errors.add(image_field_name(entry.index, "id"), INVALID_CHOICE_MESSAGE);
                continue;
            }
        }
        let Some(file) = &entry.file else {
            continue;
        };
        match inspect_image(&file.bytes, max_bytes) {
            Ok(info) => valid.push(ValidImage {
                replaces: entry.id,
                kind: info.kind,
                bytes: file.bytes.clone(),
            }),
            Err(message) => {
                tracing::debug!(
                    index = entry.index,
                    filename = %file.filename,
                    size = file.bytes.len(),
                    reason = %message,
                    "Upload rejected",
                );
                errors.add(image_field_name(entry.index, "image"), message);
            }
        }
    }

    errors.into_result().map(|()| valid)
}
