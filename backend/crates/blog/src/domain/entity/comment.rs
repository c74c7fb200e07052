//! Comment Entity
//!
//! Embedded in its entry; ids are short base62 strings.

use chrono::{DateTime, Utc};
use platform::baseconv::BASE62;
use platform::crypto::random_i63;
use serde::{Deserialize, Serialize};

use crate::domain::service::markup::{MarkupLanguage, markup};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub author: String,
    pub body: String,
    pub rendered_body: String,
    pub date: DateTime<Utc>,
    pub is_admin: bool,
}

impl Comment {
    /// Render `body` with small headings and nofollow links
    pub fn new(author: impl Into<String>, body: impl Into<String>, language: MarkupLanguage) -> Self {
        let body = body.into();
        Self {
            id: new_comment_id(),
            author: author.into(),
            rendered_body: markup(&body, language, true, true),
            body,
            date: Utc::now(),
            is_admin: false,
        }
    }

    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }
}

pub fn new_comment_id() -> String {
    BASE62.from_int(random_i63())
}
