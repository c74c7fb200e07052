//! Entity Module

pub mod comment;
pub mod entry;
