//! Domain Services
//!
//! Pure functions: markup, embedding, pagination, tag cloud and feeds.

pub mod embed;
pub mod feed;
pub mod html;
pub mod markup;
pub mod pagination;
pub mod tag_cloud;
