//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Signed, optionally compressed JSON tokens (HMAC-SHA1, URL-safe base64, zlib)
//! - Base-N integer encoding
//! - Cryptographic helpers (random tokens, HMAC, constant-time compare)
//! - Password hashing (Argon2id)
//! - Cookie management

pub mod baseconv;
pub mod cookie;
pub mod crypto;
pub mod password;
pub mod signing;
