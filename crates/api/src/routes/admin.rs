//! Route definitions for the staff admin, mounted at `/admin`.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// ```text
/// GET    /categories/          -> list_categories
/// POST   /categories/          -> create_category
/// DELETE /categories/{slug}/   -> delete_category
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/categories/",
            get(admin::list_categories).post(admin::create_category),
        )
        .route("/categories/{slug}/", delete(admin::delete_category))
}
