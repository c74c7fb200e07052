//! Domain Layer
//!
//! Entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

pub use entity::user::User;
pub use repository::UserRepository;
