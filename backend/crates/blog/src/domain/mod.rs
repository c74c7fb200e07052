//! Domain Layer
//!
//! Entities, value objects, pure services, and repository traits.

pub mod entity;
pub mod repository;
pub mod service;
pub mod value_object;

pub use entity::{comment::Comment, entry::Entry, entry::EntryBody};
pub use repository::{EntryRepository, LiveFilter};
