//! Email Value Object
//!
//! Syntactic checks only; nothing is ever sent to the address.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// RFC 5321 path limit
const EMAIL_MAX_LENGTH: usize = 254;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmailError {
    #[error("Email cannot be empty")]
    Empty,

    #[error("Email must be at most 254 characters")]
    TooLong,

    #[error("Invalid email format")]
    InvalidFormat,
}

/// Lower-cased, validated email address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    pub fn new(email: impl Into<String>) -> Result<Self, EmailError> {
        let email = email.into().trim().to_lowercase();

        if email.is_empty() {
            return Err(EmailError::Empty);
        }
        if email.len() > EMAIL_MAX_LENGTH {
            return Err(EmailError::TooLong);
        }
        if !Self::is_valid_format(&email) {
            return Err(EmailError::InvalidFormat);
        }

        Ok(Self(email))
    }

    /// Empty input means "no email"
    pub fn parse_optional(email: Option<&str>) -> Result<Option<Self>, EmailError> {
        match email.map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => Self::new(raw).map(Some),
        }
    }

    fn is_valid_format(email: &str) -> bool {
        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };

        if local.is_empty() || local.len() > 64 || domain.contains('@') {
            return false;
        }

        !domain.is_empty()
            && domain.contains('.')
            && domain
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
            && !domain.starts_with(['.', '-'])
            && !domain.ends_with(['.', '-'])
    }

    /// Rebuild from a stored value
    pub fn from_db(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Email::new(s)
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_valid() {
        assert!(Email::new("user@example.com").is_ok());
        assert!(Email::new("user.name@example.co.jp").is_ok());
        assert!(Email::new("user+tag@example.com").is_ok());
    }

    #[test]
    fn test_email_invalid() {
        assert_eq!(Email::new(""), Err(EmailError::Empty));
        for bad in [
            "userexample.com",
            "user@",
            "@example.com",
            "user@@example.com",
            "user@example",
            "user@-example.com",
        ] {
            assert_eq!(Email::new(bad), Err(EmailError::InvalidFormat), "{bad}");
        }
    }

    #[test]
    fn test_email_case_normalization() {
        let email = Email::new(" User@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "user@example.com");
    }

    #[test]
    fn test_parse_optional() {
        assert_eq!(Email::parse_optional(None), Ok(None));
        assert_eq!(Email::parse_optional(Some("  ")), Ok(None));
        assert!(Email::parse_optional(Some("a@b.io")).unwrap().is_some());
        assert!(Email::parse_optional(Some("nope")).is_err());
    }
}
