//! CSRF Tokens
//!
//! Double-submit cookie scheme: the token lives in a script-readable
//! cookie and must be echoed in a header or query parameter on every
//! unsafe request. A cross-site page can make the browser send the cookie
//! but cannot read it, so it cannot echo it.

use axum::http::Method;
use platform::crypto::{constant_time_eq, random_token};

/// Random bytes behind a token
const TOKEN_BYTES: usize = 32;

/// Upper bound on a client-supplied token
const MAX_TOKEN_LEN: usize = 128;

pub fn generate_token() -> String {
    random_token(TOKEN_BYTES)
}

/// Accept only tokens that look like ones we issue
pub fn is_well_formed(token: &str) -> bool {
    !token.is_empty()
        && token.len() <= MAX_TOKEN_LEN
        && token
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Constant-time comparison of the cookie and the echoed value
pub fn tokens_match(cookie_token: &str, presented: &str) -> bool {
    is_well_formed(cookie_token) && constant_time_eq(cookie_token.as_bytes(), presented.as_bytes())
}

/// Methods that must carry a matching token
pub fn requires_token(method: &Method) -> bool {
    !matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE)
}
