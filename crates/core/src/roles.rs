//! Well-known role name constants.
//!
//! These must match the `CHECK` constraint in `20261017000001_create_users_table.sql`.

pub const ROLE_STAFF: &str = "staff";
pub const ROLE_USER: &str = "user";
