//! Entry Entity
//!
//! A post of one of the [`EntryType`]s. Fields shared by every type live on
//! [`Entry`]; the per-type payload is the [`EntryBody`] union.
//!
//! ## Visibility
//! An entry is *live* when it is published, its publish date (if any) has
//! passed and its expiry date (if any) has not.

use chrono::{DateTime, Utc};
use kernel::id::EntryId;
use serde::{Deserialize, Serialize};

use crate::domain::entity::comment::Comment;
use crate::domain::service::embed;
use crate::domain::service::markup::{MarkupLanguage, markup};
use crate::domain::value_object::author::Author;
use crate::domain::value_object::entry_type::EntryType;
use crate::domain::value_object::permalink::Permalink;
use crate::domain::value_object::slug::Slug;

/// Per-type payload, stored as JSON tagged with the type key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EntryBody {
    Text {
        content: String,
        /// `content` rendered at save time
        rendered_content: String,
    },
    Link {
        link_url: String,
        description: Option<String>,
    },
    Image {
        image_url: String,
        description: Option<String>,
    },
    Video {
        video_url: String,
        description: Option<String>,
    },
}

impl EntryBody {
    pub fn text(content: impl Into<String>, language: MarkupLanguage) -> Self {
        let content = content.into();
        EntryBody::Text {
            rendered_content: markup(&content, language, false, true),
            content,
        }
    }

    pub fn entry_type(&self) -> EntryType {
        match self {
            EntryBody::Text { .. } => EntryType::Text,
            EntryBody::Link { .. } => EntryType::Link,
            EntryBody::Image { .. } => EntryType::Image,
            EntryBody::Video { .. } => EntryType::Video,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            EntryBody::Text { .. } => None,
            EntryBody::Link { description, .. }
            | EntryBody::Image { description, .. }
            | EntryBody::Video { description, .. } => description.as_deref(),
        }
    }

    /// HTML shown as the entry content
    pub fn rendered_content(&self, language: MarkupLanguage) -> String {
        let description = self
            .description()
            .filter(|d| !d.trim().is_empty())
            .map(|d| markup(d, language, false, true));

        match self {
            EntryBody::Text {
                rendered_content, ..
            } => rendered_content.clone(),
            EntryBody::Link { link_url, .. } => {
                description.unwrap_or_else(|| embed::link_html(link_url))
            }
            EntryBody::Image { image_url, .. } => {
                embed::image_html(image_url) + &description.unwrap_or_default()
            }
            EntryBody::Video { video_url, .. } => {
                embed::video_html(video_url) + &description.unwrap_or_default()
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Entry {
    pub id: EntryId,
    pub title: String,
    pub slug: Slug,
    pub author: Option<Author>,
    pub tags: Vec<String>,
    pub body: EntryBody,
    pub comments: Vec<Comment>,
    pub comments_enabled: bool,
    pub published: bool,
    pub publish_date: Option<DateTime<Utc>>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entry {
    /// Published now, comments on, no tags
    pub fn new(title: impl Into<String>, slug: Slug, body: EntryBody) -> Self {
        let now = Utc::now();
        Self {
            id: EntryId::new(),
            title: title.into(),
            slug,
            author: None,
            tags: Vec::new(),
            body,
            comments: Vec::new(),
            comments_enabled: true,
            published: true,
            publish_date: Some(now),
            expiry_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_author(mut self, author: Option<Author>) -> Self {
        self.author = author;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn entry_type(&self) -> EntryType {
        self.body.entry_type()
    }

    /// Publish date, or creation date for entries without one
    pub fn display_date(&self) -> DateTime<Utc> {
        self.publish_date.unwrap_or(self.created_at)
    }

    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.published
            && self.publish_date.is_none_or(|d| d <= now)
            && self.expiry_date.is_none_or(|d| d > now)
    }

    pub fn permalink(&self) -> Permalink {
        Permalink::new(self.display_date().date_naive(), self.slug.clone())
    }

    /// Where the title links: the target for link entries, else the
    /// permalink
    pub fn title_url(&self) -> String {
        match &self.body {
            EntryBody::Link { link_url, .. } => link_url.clone(),
            _ => self.permalink().path(),
        }
    }

    pub fn rendered_content(&self, language: MarkupLanguage) -> String {
        self.body.rendered_content(language)
    }

    pub fn find_comment(&self, comment_id: &str) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == comment_id)
    }
}
