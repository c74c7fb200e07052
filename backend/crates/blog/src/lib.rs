//! Blog Backend Module
//!
//! A tumblelog: text, link, image and video entries with tags, comments
//! and feeds.
//!
//! Clean Architecture structure:
//! - `domain/` - Entry and comment entities, value objects, markup/feed
//!   services, repository trait
//! - `application/` - Use cases (browse, detail, comment, tags, feeds, admin)
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Visibility
//! An entry is live when it is published, its publish date has passed and
//! it has not expired. Listings, tags and feeds only ever show live
//! entries; staff can open any entry through its permalink.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

pub use application::config::BlogConfig;
pub use error::{BlogError, BlogResult};
pub use infra::{InMemoryEntryRepository, PgEntryRepository};
pub use presentation::router::{blog_router, blog_router_generic};

pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::comment::Comment;
    pub use crate::domain::entity::entry::{Entry, EntryBody};
    pub use crate::domain::value_object::entry_type::EntryType;
    pub use crate::presentation::dto::*;
}


#[cfg(test)]
mod tests;
