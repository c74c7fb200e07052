//! Value Object Module

pub mod author;
pub mod entry_type;
pub mod permalink;
pub mod slug;
pub mod tag;
