//! User Name Value Object
//!
//! Admin login handle.
//!
//! ## Rules
//! - NFKC-normalized and trimmed before validation
//! - 3 to 30 characters from `A-Z a-z 0-9 _ . -`
//! - Case is preserved for display; lookups and uniqueness use the
//!   lower-cased canonical form

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

pub const USER_NAME_MIN_LENGTH: usize = 3;
pub const USER_NAME_MAX_LENGTH: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserNameError {
    #[error("User name cannot be empty")]
    Empty,

    #[error("User name must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    #[error("User name must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("User name contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// Validated user name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName {
    original: String,
    canonical: String,
}

impl UserName {
    pub fn new(input: &str) -> Result<Self, UserNameError> {
        let original: String = input.nfkc().collect::<String>().trim().to_string();
        Self::validate(&original)?;
        Ok(Self {
            canonical: original.to_lowercase(),
            original,
        })
    }

    /// Rebuild from a stored value
    pub fn from_db(original: &str) -> Result<Self, UserNameError> {
        Self::new(original)
    }

    /// As entered (display form)
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Lower-cased form used for lookups
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    pub fn as_str(&self) -> &str {
        &self.original
    }

    fn validate(name: &str) -> Result<(), UserNameError> {
        if name.is_empty() {
            return Err(UserNameError::Empty);
        }

        let len = name.chars().count();
        if len < USER_NAME_MIN_LENGTH {
            return Err(UserNameError::TooShort {
                min: USER_NAME_MIN_LENGTH,
                actual: len,
            });
        }
        if len > USER_NAME_MAX_LENGTH {
            return Err(UserNameError::TooLong {
                max: USER_NAME_MAX_LENGTH,
                actual: len,
            });
        }

        match name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')))
        {
            Some(c) => Err(UserNameError::InvalidCharacter(c)),
            None => Ok(()),
        }
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.original
    }
}

impl TryFrom<String> for UserName {
    type Error = UserNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<UserName> for String {
    fn from(name: UserName) -> Self {
        name.original
    }
}
