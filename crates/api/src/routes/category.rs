//! Route definitions for category pages.

use axum::routing::get;
use axum::Router;

use crate::handlers::category;
use crate::state::AppState;

/// ```text
/// GET /category/{slug}/  -> detail
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/category/{slug}/", get(category::detail))
}
