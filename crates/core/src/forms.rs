//! Person form cleaning and field-level error collection.
//!
//! The API layer binds raw submitted strings into [`PersonInput`]; cleaning
//! turns them into a [`CleanedPerson`] or a [`FormErrors`] map keyed by field
//! name, suitable for redisplaying the form.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::types::Timestamp;

/// Format of the `created` field's initial value.
pub const CREATED_INITIAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Naive formats accepted for `created` besides RFC 3339. Interpreted as UTC.
const CREATED_INPUT_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const INVALID_CHOICE_MESSAGE: &str =
    "Select a valid choice. That choice is not one of the available choices.";
pub const INVALID_DATETIME_MESSAGE: &str = "Enter a valid date/time.";
pub const NULL_CHARACTERS_MESSAGE: &str = "Null characters are not allowed.";

/// PostgreSQL text cannot hold NUL, so such input is refused up front.
pub fn has_null_characters(value: &str) -> bool {
    value.contains('\0')
}

/// `validator` hook for free-text fields that end up in the database.
pub fn reject_null_characters(value: &str) -> Result<(), ValidationError> {
    if has_null_characters(value) {
        let mut error = ValidationError::new("null_characters");
        error.message = Some(NULL_CHARACTERS_MESSAGE.into());
        return Err(error);
    }
    Ok(())
}

/// Field-level validation errors, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn merge(&mut self, other: FormErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    /// `Ok(())` when no errors were collected.
    pub fn into_result(self) -> Result<(), FormErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = FormErrors::new();
        for (field, field_errors) in errors.field_errors() {
            for err in field_errors {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                out.add(field.to_string(), message);
            }
        }
        out
    }
}

/// Raw person fields as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PersonInput {
    pub category: String,
    #[validate(length(max = 100, message = "Ensure this value has at most 100 characters."))]
    pub name: String,
    #[validate(length(max = 255, message = "Ensure this value has at most 255 characters."))]
    pub contact: String,
    #[validate(length(max = 5000, message = "Ensure this value has at most 5000 characters."))]
    pub description: String,
    #[validate(length(max = 255, message = "Ensure this value has at most 255 characters."))]
    pub address: String,
    pub created: String,
}

/// Person fields after successful cleaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedPerson {
    pub category: String,
    pub name: String,
    pub contact: String,
    pub description: String,
    pub address: Option<String>,
    pub created: Timestamp,
}

impl PersonInput {
    /// Empty form with `created` preset to `now`.
    pub fn initial(now: Timestamp) -> Self {
        Self {
            created: now.format(CREATED_INITIAL_FORMAT).to_string(),
            ..Self::default()
        }
    }

    /// Copy with surrounding whitespace removed from every field.
    fn trimmed(&self) -> Self {
        Self {
            category: self.category.trim().to_string(),
            name: self.name.trim().to_string(),
            contact: self.contact.trim().to_string(),
            description: self.description.trim().to_string(),
            address: self.address.trim().to_string(),
            created: self.created.trim().to_string(),
        }
    }

    /// Validate and normalise the submitted fields.
    ///
    /// Length limits apply to the trimmed values, which are what gets stored.
    /// Category existence is not checked here; it needs the database.
    pub fn clean(&self, now: Timestamp) -> Result<CleanedPerson, FormErrors> {
        let input = self.trimmed();
        let mut errors = match input.validate() {
            Ok(()) => FormErrors::new(),
            Err(e) => FormErrors::from(e),
        };

        let fields = [
            ("category", &input.category),
            ("name", &input.name),
            ("contact", &input.contact),
            ("description", &input.description),
            ("address", &input.address),
            ("created", &input.created),
        ];
        for (field, value) in fields {
            if has_null_characters(value) {
                errors.add(field, NULL_CHARACTERS_MESSAGE);
            }
        }

        for (field, value) in [
            ("category", &input.category),
            ("name", &input.name),
            ("contact", &input.contact),
        ] {
            if value.is_empty() {
                errors.add(field, REQUIRED_MESSAGE);
            }
        }

        let created = if has_null_characters(&input.created) {
            None
        } else {
            match parse_created(&input.created, now) {
                Ok(ts) => Some(ts),
                Err(message) => {
                    errors.add("created", message);
                    None
                }
            }
        };

        errors.into_result()?;

        Ok(CleanedPerson {
            address: (!input.address.is_empty()).then(|| input.address.clone()),
            category: input.category,
            name: input.name,
            contact: input.contact,
            description: input.description,
            created: created.unwrap_or(now),
        })
    }
}

/// Parse the optional `created` field. Blank input means `now`.
pub fn parse_created(raw: &str, now: Timestamp) -> Result<Timestamp, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(now);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    for format in CREATED_INPUT_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or(INVALID_DATETIME_MESSAGE)
}
