//! Route definitions for person pages.

use axum::routing::get;
use axum::Router;

use crate::handlers::person;
use crate::state::AppState;

/// ```text
/// GET  /person-detail/{id}/   -> detail
/// GET  /add-person/           -> add_person_form
/// POST /add-person/           -> add_person
/// GET  /update-person/{id}/   -> update_person_form
/// POST /update-person/{id}/   -> update_person
/// GET  /delete-person/{id}/   -> delete_person_confirm
/// POST /delete-person/{id}/   -> delete_person
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/person-detail/{id}/", get(person::detail))
        .route(
            "/add-person/",
            get(person::add_person_form).post(person::add_person),
        )
        .route(
            "/update-person/{id}/",
            get(person::update_person_form).post(person::update_person),
        )
        .route(
            "/delete-person/{id}/",
            get(person::delete_person_confirm).post(person::delete_person),
        )
}
