//! Manage Entries Use Case
//!
//! Staff-only operations: dashboard, create, edit, delete entries and
//! delete comments.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::id::EntryId;
use url::Url;

use crate::application::config::BlogConfig;
use crate::domain::entity::entry::{Entry, EntryBody};
use crate::domain::repository::EntryRepository;
use crate::domain::value_object::author::Author;
use crate::domain::value_object::entry_type::EntryType;
use crate::domain::value_object::slug::Slug;
use crate::domain::value_object::tag::{TAG_MAX_LENGTH, normalize_tags, split_tag_input};
use crate::error::{BlogError, BlogResult};

pub const TITLE_MAX_LENGTH: usize = 200;

/// Admin form fields; which of the per-type fields are used depends on
/// the entry type
#[derive(Debug, Clone, Default)]
pub struct EntryInput {
    pub title: String,
    pub slug: String,
    /// Free-form, split on commas or whitespace
    pub tags: String,
    pub published: bool,
    pub comments_enabled: bool,
    pub publish_date: Option<DateTime<Utc>>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub content: Option<String>,
    pub link_url: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub entries: Vec<Entry>,
    pub entry_types: Vec<EntryType>,
}

pub struct ManageEntriesUseCase<R>
where
    R: EntryRepository,
{
    repo: Arc<R>,
    config: Arc<BlogConfig>,
}

impl<R> ManageEntriesUseCase<R>
where
    R: EntryRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<BlogConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn dashboard(&self) -> BlogResult<Dashboard> {
        Ok(Dashboard {
            entries: self.repo.list_recent(self.config.dashboard_size).await?,
            entry_types: EntryType::ALL.to_vec(),
        })
    }

    /// Entries without a publish date are published now
    pub async fn create(
        &self,
        entry_type: &str,
        input: EntryInput,
        author: Option<Author>,
    ) -> BlogResult<Entry> {
        let entry_type: EntryType = entry_type.parse()?;
        let fields = self.validate(entry_type, input)?;

        let mut entry = Entry::new(fields.title, fields.slug, fields.body)
            .with_author(author)
            .with_tags(fields.tags);
        entry.published = fields.published;
        entry.comments_enabled = fields.comments_enabled;
        entry.publish_date = fields.publish_date.or(Some(entry.created_at));
        entry.expiry_date = fields.expiry_date;
        check_expiry(&entry)?;

        self.repo.create(&entry).await?;
        tracing::info!(
            entry_id = %entry.id,
            entry_type = %entry_type,
            slug = %entry.slug,
            "Entry created"
        );
        Ok(entry)
    }

    pub async fn get(&self, entry_id: &EntryId) -> BlogResult<Entry> {
        self.repo
            .find_by_id(entry_id)
            .await?
            .ok_or(BlogError::EntryNotFound)
    }

    /// The type, author, comments and creation date are kept; a missing
    /// publish date keeps the current one
    pub async fn update(&self, entry_id: &EntryId, input: EntryInput) -> BlogResult<Entry> {
        let mut entry = self.get(entry_id).await?;
        let fields = self.validate(entry.entry_type(), input)?;

        entry.title = fields.title;
        entry.slug = fields.slug;
        entry.tags = fields.tags;
        entry.body = fields.body;
        entry.published = fields.published;
        entry.comments_enabled = fields.comments_enabled;
        if fields.publish_date.is_some() {
            entry.publish_date = fields.publish_date;
        }
        entry.expiry_date = fields.expiry_date;
        check_expiry(&entry)?;
        entry.updated_at = Utc::now();

        self.repo.update(&entry).await?;
        tracing::info!(entry_id = %entry.id, "Entry updated");
        Ok(entry)
    }

    pub async fn delete(&self, entry_id: &EntryId) -> BlogResult<()> {
        if !self.repo.delete(entry_id).await? {
            return Err(BlogError::EntryNotFound);
        }
        tracing::info!(entry_id = %entry_id, "Entry deleted");
        Ok(())
    }

    /// Returns the entry the comment was removed from
    pub async fn delete_comment(&self, comment_id: &str) -> BlogResult<Entry> {
        let entry = self
            .repo
            .remove_comment(comment_id)
            .await?
            .ok_or(BlogError::CommentNotFound)?;
        tracing::info!(entry_id = %entry.id, comment_id, "Comment deleted");
        Ok(entry)
    }

    fn validate(&self, entry_type: EntryType, input: EntryInput) -> BlogResult<ValidEntry> {
        let title = input.title.trim().to_string();
        if title.is_empty() {
            return Err(BlogError::validation("title", "This field is required"));
        }
        if title.chars().count() > TITLE_MAX_LENGTH {
            return Err(BlogError::validation(
                "title",
                format!("At most {TITLE_MAX_LENGTH} characters"),
            ));
        }

        let slug = Slug::new(&input.slug)?;

        let tags = normalize_tags(split_tag_input(&input.tags));
        if let Some(tag) = tags.iter().find(|t| t.len() > TAG_MAX_LENGTH) {
            return Err(BlogError::validation(
                "tags",
                format!("Tag {tag:?} is longer than {TAG_MAX_LENGTH} characters"),
            ));
        }

        let description = input
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        let body = match entry_type {
            EntryType::Text => {
                let content = required("content", input.content)?;
                EntryBody::text(content, self.config.markup_language)
            }
            EntryType::Link => EntryBody::Link {
                link_url: required_url("link_url", input.link_url)?,
                description,
            },
            EntryType::Image => EntryBody::Image {
                image_url: required_url("image_url", input.image_url)?,
                description,
            },
            EntryType::Video => EntryBody::Video {
                video_url: required_url("video_url", input.video_url)?,
                description,
            },
        };

        Ok(ValidEntry {
            title,
            slug,
            tags,
            body,
            published: input.published,
            comments_enabled: input.comments_enabled,
            publish_date: input.publish_date,
            expiry_date: input.expiry_date,
        })
    }
}

struct ValidEntry {
    title: String,
    slug: Slug,
    tags: Vec<String>,
    body: EntryBody,
    published: bool,
    comments_enabled: bool,
    publish_date: Option<DateTime<Utc>>,
    expiry_date: Option<DateTime<Utc>>,
}

/// Expiry is compared with the publish date the entry ends up with
fn check_expiry(entry: &Entry) -> BlogResult<()> {
    match (entry.publish_date, entry.expiry_date) {
        (Some(publish), Some(expiry)) if expiry <= publish => Err(BlogError::validation(
            "expiry_date",
            "Must be after the publish date",
        )),
        _ => Ok(()),
    }
}

fn required(field: &'static str, value: Option<String>) -> BlogResult<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| BlogError::validation(field, "This field is required"))
}

/// Absolute http(s) URL
fn required_url(field: &'static str, value: Option<String>) -> BlogResult<String> {
    let raw = required(field, value)?;
    match Url::parse(&raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Ok(raw),
        _ => Err(BlogError::validation(field, "Enter a valid http(s) URL")),
    }
}
