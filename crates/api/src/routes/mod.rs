pub mod admin;
pub mod auth;
pub mod category;
pub mod health;
pub mod home;
pub mod person;

use axum::Router;

use crate::state::AppState;

/// Build the page route tree.
///
/// Route hierarchy:
///
/// ```text
/// /                                     home listing, search, "new" filter
/// /category/{slug}/                     persons in a category
///
/// /person-detail/{id}/                  person detail
/// /add-person/                          create form (GET, POST; login required)
/// /update-person/{id}/                  update form (GET, POST; owner only)
/// /delete-person/{id}/                  delete confirm / delete (GET, POST; owner only)
///
/// /login/                               login (POST)
/// /register/                            register (POST)
///
/// /admin/categories/                    list, create (staff only)
/// /admin/categories/{slug}/             delete (staff only)
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .merge(home::router())
        .merge(category::router())
        .merge(person::router())
        .merge(auth::router())
        .nest("/admin", admin::router())
}
