//! Slug Value Object
//!
//! URL-safe entry handle: one or more of `A-Z a-z 0-9 _ -`.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const SLUG_MAX_LENGTH: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlugError {
    #[error("Slug cannot be empty")]
    Empty,

    #[error("Slug must be at most 200 characters")]
    TooLong,

    #[error("Slug contains invalid character {0:?}")]
    InvalidCharacter(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    pub fn new(input: &str) -> Result<Self, SlugError> {
        let slug = input.trim();
        if slug.is_empty() {
            return Err(SlugError::Empty);
        }
        if slug.len() > SLUG_MAX_LENGTH {
            return Err(SlugError::TooLong);
        }
        if let Some(c) = slug
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
        {
            return Err(SlugError::InvalidCharacter(c));
        }
        Ok(Self(slug.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_slugs() {
        assert_eq!(Slug::new("hello-world").unwrap().as_str(), "hello-world");
        assert_eq!(Slug::new(" My_Post_2 ").unwrap().as_str(), "My_Post_2");
    }

    #[test]
    fn test_invalid_slugs() {
        assert_eq!(Slug::new("   "), Err(SlugError::Empty));
        assert_eq!(Slug::new("a b"), Err(SlugError::InvalidCharacter(' ')));
        assert_eq!(Slug::new("a/b"), Err(SlugError::InvalidCharacter('/')));
        assert_eq!(Slug::new("caf\u{e9}"), Err(SlugError::InvalidCharacter('\u{e9}')));
        assert_eq!(Slug::new(&"a".repeat(201)), Err(SlugError::TooLong));
    }
}
