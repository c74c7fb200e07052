//! Application Configuration
//!
//! Secrets, cookie names and lifetimes for the auth layer.

use std::time::Duration;

use platform::cookie::CookieConfig;
use platform::crypto::random_bytes;
use platform::signing::Signer;

pub use platform::cookie::SameSite;

use crate::domain::value_object::session_claims::SESSION_SALT;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Cookie carrying the signed session claims
    pub session_cookie_name: String,
    /// Current signing key
    pub secret_key: Vec<u8>,
    /// Retired signing key, accepted for verification only
    pub previous_secret_key: Option<Vec<u8>>,
    /// Sessions older than this are refused (14 days)
    pub session_ttl: Duration,
    pub csrf_cookie_name: String,
    /// Header a client echoes the CSRF token in
    pub csrf_header_name: String,
    /// Query parameter alternative to the header
    pub csrf_param_name: String,
    /// CSRF cookie lifetime (52 days)
    pub csrf_ttl: Duration,
    pub cookie_secure: bool,
    pub cookie_same_site: SameSite,
    /// Application-wide secret mixed into password hashes
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "userid".to_string(),
            secret_key: Vec::new(),
            previous_secret_key: None,
            session_ttl: Duration::from_secs(14 * 24 * 3600),
            csrf_cookie_name: "csrftoken".to_string(),
            csrf_header_name: "x-csrftoken".to_string(),
            csrf_param_name: "csrftoken".to_string(),
            csrf_ttl: Duration::from_secs(52 * 24 * 3600),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            password_pepper: None,
        }
    }
}

impl AuthConfig {
    pub fn new(secret_key: impl Into<Vec<u8>>) -> Self {
        Self {
            secret_key: secret_key.into(),
            ..Default::default()
        }
    }

    /// Random secret; sessions do not survive a restart
    pub fn with_random_secret() -> Self {
        Self::new(random_bytes(32))
    }

    /// Random secret and cookies usable over plain HTTP
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    pub fn session_ttl_ms(&self) -> i64 {
        self.session_ttl.as_millis() as i64
    }

    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    /// Signer for session cookies
    pub fn session_signer(&self) -> Signer {
        Signer::new(self.secret_key.clone())
            .with_previous_key(self.previous_secret_key.clone())
            .with_salt(SESSION_SALT)
    }

    pub fn session_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.session_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(self.session_ttl.as_secs() as i64),
        }
    }

    /// Readable from scripts so clients can echo it back
    pub fn csrf_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.csrf_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: false,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(self.csrf_ttl.as_secs() as i64),
        }
    }
}
