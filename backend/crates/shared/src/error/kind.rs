//! Error Kind
//!
//! Coarse classification shared by every crate; each kind is one HTTP
//! status.

use serde::Serialize;

/// Error classification
///
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// assert_eq!(ErrorKind::NotFound.status_code(), 404);
/// assert_eq!(ErrorKind::UnprocessableEntity.title(), "Unprocessable Entity");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// Request or stored value the database refuses outright
    BadRequest,
    /// No session, or a session that no longer verifies
    Unauthorized,
    /// Signed in but not staff, comments closed, CSRF mismatch
    Forbidden,
    NotFound,
    /// Unique user name already taken
    Conflict,
    /// Form input that failed validation
    UnprocessableEntity,
    InternalServerError,
    /// Database unreachable or out of resources
    ServiceUnavailable,
}

impl ErrorKind {
    const fn parts(self) -> (u16, &'static str) {
        match self {
            ErrorKind::BadRequest => (400, "Bad Request"),
            ErrorKind::Unauthorized => (401, "Unauthorized"),
            ErrorKind::Forbidden => (403, "Forbidden"),
            ErrorKind::NotFound => (404, "Not Found"),
            ErrorKind::Conflict => (409, "Conflict"),
            ErrorKind::UnprocessableEntity => (422, "Unprocessable Entity"),
            ErrorKind::InternalServerError => (500, "Internal Server Error"),
            ErrorKind::ServiceUnavailable => (503, "Service Unavailable"),
        }
    }

    #[inline]
    pub const fn status_code(self) -> u16 {
        self.parts().0
    }

    /// Reason phrase, used as the problem `title`
    #[inline]
    pub const fn title(self) -> &'static str {
        self.parts().1
    }

    /// 5xx; logged at error level and never shown in detail
    #[inline]
    pub const fn is_server_error(self) -> bool {
        self.status_code() >= 500
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}
