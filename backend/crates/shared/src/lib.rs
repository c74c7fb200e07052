//! Shared Kernel - Domain-crossing minimal core
//!
//! Vocabulary shared by the auth and blog crates:
//! - Unified error type ([`error::app_error::AppError`]) and result alias
//! - Typed ID wrappers for entries and users
//!
//! Only things whose meaning is identical in every domain live here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
