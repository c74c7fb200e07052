//! API DTOs (Data Transfer Objects)
//!
//! Timestamps are Unix milliseconds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::{Dashboard, EntryInput, EntryListing};
use crate::domain::entity::comment::Comment;
use crate::domain::entity::entry::{Entry, EntryBody};
use crate::domain::service::markup::MarkupLanguage;
use crate::domain::service::pagination::Page;
use crate::domain::service::tag_cloud::TagWeight;
use crate::domain::value_object::entry_type::EntryType;
use crate::domain::value_object::tag::join_tags;
use crate::error::{BlogError, BlogResult};

// ============================================================================
// Entries
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryResponse {
    pub id: String,
    pub entry_type: EntryType,
    pub title: String,
    pub slug: String,
    pub permalink: String,
    /// Link target of the title; differs from `permalink` for link entries
    pub title_url: String,
    pub author: Option<String>,
    pub tags: Vec<String>,
    pub rendered_content: String,
    pub comments_enabled: bool,
    pub comment_count: usize,
    pub published: bool,
    pub publish_date: Option<i64>,
    pub expiry_date: Option<i64>,
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<CommentResponse>>,
}

impl EntryResponse {
    /// Listing form, without comments
    pub fn summary(entry: &Entry, language: MarkupLanguage) -> Self {
        Self {
            id: entry.id.to_string(),
            entry_type: entry.entry_type(),
            title: entry.title.clone(),
            slug: entry.slug.to_string(),
            permalink: entry.permalink().path(),
            title_url: entry.title_url(),
            author: entry.author.as_ref().map(|a| a.name.clone()),
            tags: entry.tags.clone(),
            rendered_content: entry.rendered_content(language),
            comments_enabled: entry.comments_enabled,
            comment_count: entry.comments.len(),
            published: entry.published,
            publish_date: entry.publish_date.map(|d| d.timestamp_millis()),
            expiry_date: entry.expiry_date.map(|d| d.timestamp_millis()),
            created_at: entry.created_at.timestamp_millis(),
            comments: None,
        }
    }

    pub fn detail(entry: &Entry, language: MarkupLanguage) -> Self {
        Self {
            comments: Some(entry.comments.iter().map(CommentResponse::from).collect()),
            ..Self::summary(entry, language)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub number: u64,
    pub num_pages: u64,
    pub total: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> From<&Page<T>> for PageResponse {
    fn from(page: &Page<T>) -> Self {
        Self {
            number: page.number,
            num_pages: page.num_pages,
            total: page.total,
            has_next: page.has_next(),
            has_previous: page.has_previous(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryListResponse {
    pub title: String,
    pub entry_type: Option<EntryType>,
    pub tag: Option<String>,
    /// Labels of every entry type, for archive navigation
    pub entry_types: Vec<String>,
    pub entries: Vec<EntryResponse>,
    pub page: PageResponse,
}

impl EntryListResponse {
    pub fn new(listing: &EntryListing, language: MarkupLanguage) -> Self {
        Self {
            title: listing.title.clone(),
            entry_type: listing.entry_type,
            tag: listing.tag.clone(),
            entry_types: EntryType::labels(),
            entries: listing
                .page
                .items
                .iter()
                .map(|e| EntryResponse::summary(e, language))
                .collect(),
            page: PageResponse::from(&listing.page),
        }
    }
}

// ============================================================================
// Comments
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub author: String,
    pub rendered_body: String,
    pub date: i64,
    pub is_admin: bool,
}

impl From<&Comment> for CommentResponse {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id.clone(),
            author: comment.author.clone(),
            rendered_body: comment.rendered_body.clone(),
            date: comment.date.timestamp_millis(),
            is_admin: comment.is_admin,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentCreatedResponse {
    pub comment: CommentResponse,
    /// Where the comment is shown
    pub location: String,
}

// ============================================================================
// Tags
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagWeightResponse {
    pub tag: String,
    pub count: u64,
    pub frequency: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagCloudResponse {
    pub tags: Vec<TagWeightResponse>,
}

impl From<Vec<TagWeight>> for TagCloudResponse {
    fn from(weights: Vec<TagWeight>) -> Self {
        Self {
            tags: weights
                .into_iter()
                .map(|w| TagWeightResponse {
                    tag: w.tag,
                    count: w.count,
                    frequency: w.frequency,
                })
                .collect(),
        }
    }
}

// ============================================================================
// Admin
// ============================================================================

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    /// Comma- or space-separated
    #[serde(default)]
    pub tags: String,
    #[serde(default = "default_true")]
    pub published: bool,
    #[serde(default = "default_true")]
    pub comments_enabled: bool,
    pub publish_date: Option<i64>,
    pub expiry_date: Option<i64>,
    pub content: Option<String>,
    pub link_url: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub description: Option<String>,
}

fn from_millis(field: &'static str, ms: Option<i64>) -> BlogResult<Option<DateTime<Utc>>> {
    ms.map(|ms| {
        DateTime::from_timestamp_millis(ms)
            .ok_or_else(|| BlogError::validation(field, "Timestamp out of range"))
    })
    .transpose()
}

impl TryFrom<EntryRequest> for EntryInput {
    type Error = BlogError;

    fn try_from(req: EntryRequest) -> Result<Self, Self::Error> {
        Ok(EntryInput {
            publish_date: from_millis("publish_date", req.publish_date)?,
            expiry_date: from_millis("expiry_date", req.expiry_date)?,
            title: req.title,
            slug: req.slug,
            tags: req.tags,
            published: req.published,
            comments_enabled: req.comments_enabled,
            content: req.content,
            link_url: req.link_url,
            image_url: req.image_url,
            video_url: req.video_url,
            description: req.description,
        })
    }
}

/// Editable values as the admin form shows them
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryFormResponse {
    pub title: String,
    pub slug: String,
    pub tags: String,
    pub published: bool,
    pub comments_enabled: bool,
    pub publish_date: Option<i64>,
    pub expiry_date: Option<i64>,
    pub content: Option<String>,
    pub link_url: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub description: Option<String>,
}

impl From<&Entry> for EntryFormResponse {
    fn from(entry: &Entry) -> Self {
        let mut form = Self {
            title: entry.title.clone(),
            slug: entry.slug.to_string(),
            tags: join_tags(&entry.tags),
            published: entry.published,
            comments_enabled: entry.comments_enabled,
            publish_date: entry.publish_date.map(|d| d.timestamp_millis()),
            expiry_date: entry.expiry_date.map(|d| d.timestamp_millis()),
            content: None,
            link_url: None,
            image_url: None,
            video_url: None,
            description: entry.body.description().map(str::to_string),
        };
        match &entry.body {
            EntryBody::Text { content, .. } => form.content = Some(content.clone()),
            EntryBody::Link { link_url, .. } => form.link_url = Some(link_url.clone()),
            EntryBody::Image { image_url, .. } => form.image_url = Some(image_url.clone()),
            EntryBody::Video { video_url, .. } => form.video_url = Some(video_url.clone()),
        }
        form
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminEntryResponse {
    pub entry: EntryResponse,
    pub form: EntryFormResponse,
}

impl AdminEntryResponse {
    pub fn new(entry: &Entry, language: MarkupLanguage) -> Self {
        Self {
            entry: EntryResponse::detail(entry, language),
            form: EntryFormResponse::from(entry),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryTypeResponse {
    pub key: &'static str,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub entries: Vec<EntryResponse>,
    pub entry_types: Vec<EntryTypeResponse>,
}

impl DashboardResponse {
    pub fn new(dashboard: &Dashboard, language: MarkupLanguage) -> Self {
        Self {
            entries: dashboard
                .entries
                .iter()
                .map(|e| EntryResponse::summary(e, language))
                .collect(),
            entry_types: dashboard
                .entry_types
                .iter()
                .map(|t| EntryTypeResponse {
                    key: t.as_str(),
                    label: t.to_string(),
                })
                .collect(),
        }
    }
}
