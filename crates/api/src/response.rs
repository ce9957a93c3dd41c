//! Rendered page envelope and fixed responses shared by handlers.
//!
//! Every page is a `{ "template": ..., "data": ... }` document. The front end
//! renders the named template with `data` as its context.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Body returned when a caller may not touch a resource they asked to edit.
pub const FORBIDDEN_BODY: &str = "<h1>403 Forbidden</h1>";

/// A rendered page: template name plus its context.
///
/// # Example
///
/// ```ignore
/// Ok(Page::new("person-detail", detail))
/// ```
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub template: &'static str,
    pub data: T,
}

impl<T: Serialize> Page<T> {
    pub fn new(template: &'static str, data: T) -> Self {
        Self { template, data }
    }

    /// Render with a non-200 status, e.g. 422 for a form with errors.
    pub fn with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

impl<T: Serialize> IntoResponse for Page<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Plain HTML 403 used by the owner check on edits.
pub fn forbidden() -> Response {
    (StatusCode::FORBIDDEN, Html(FORBIDDEN_BODY)).into_response()
}
