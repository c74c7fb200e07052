//! Value Object Module

pub mod email;
pub mod session_claims;
pub mod user_id;
pub mod user_name;
