//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//!   Also usable as `Option<AuthUser>` on pages anonymous callers may view.
//! - [`auth::LoginRequired`] -- Like `AuthUser`, but redirects anonymous callers to login.
//! - [`rbac::RequireStaff`] -- Requires the `staff` role.

pub mod auth;
pub mod rbac;
