//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod category_repo;
pub mod flash_message_repo;
pub mod image_repo;
pub mod person_repo;
pub mod user_repo;

pub use category_repo::CategoryRepo;
pub use flash_message_repo::FlashMessageRepo;
pub use image_repo::ImageRepo;
pub use person_repo::PersonRepo;
pub use user_repo::UserRepo;
