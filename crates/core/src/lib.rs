//! Domain building blocks shared by the database and API crates.
//!
//! Nothing in here touches the network or the database, so every rule can be
//! unit tested in isolation.

pub mod category;
pub mod error;
pub mod forms;
pub mod images;
pub mod listing;
pub mod pagination;
pub mod permissions;
pub mod roles;
pub mod types;
