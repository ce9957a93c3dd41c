//! Request handlers.
//!
//! Page handlers return a [`Page`](crate::response::Page) envelope, form
//! posts answer with a redirect or a 422 page. Handlers delegate persistence
//! to the repositories in `roster_db` and map errors via
//! [`AppError`](crate::error::AppError).

pub mod admin;
pub mod auth;
pub mod category;
pub mod home;
pub mod person;
