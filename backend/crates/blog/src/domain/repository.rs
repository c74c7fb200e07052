//! Repository Traits
//!
//! Interfaces for data persistence. Implementations live in `infra/`.

use chrono::{DateTime, Utc};
use kernel::id::EntryId;

use crate::domain::entity::comment::Comment;
use crate::domain::entity::entry::Entry;
use crate::domain::value_object::entry_type::EntryType;
use crate::domain::value_object::slug::Slug;
use crate::error::BlogResult;

/// Selects live entries at `now`, optionally narrowed by type and tag
#[derive(Debug, Clone)]
pub struct LiveFilter {
    pub now: DateTime<Utc>,
    pub entry_type: Option<EntryType>,
    pub tag: Option<String>,
}

impl LiveFilter {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now,
            entry_type: None,
            tag: None,
        }
    }

    pub fn with_type(mut self, entry_type: EntryType) -> Self {
        self.entry_type = Some(entry_type);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn matches(&self, entry: &Entry) -> bool {
        entry.is_live(self.now)
            && self.entry_type.is_none_or(|t| entry.entry_type() == t)
            && self
                .tag
                .as_ref()
                .is_none_or(|tag| entry.tags.iter().any(|t| t == tag))
    }
}

#[trait_variant::make(EntryRepository: Send)]
pub trait LocalEntryRepository {
    async fn create(&self, entry: &Entry) -> BlogResult<()>;

    /// Replaces every field except the comments
    async fn update(&self, entry: &Entry) -> BlogResult<()>;

    /// `false` when there was nothing to delete
    async fn delete(&self, entry_id: &EntryId) -> BlogResult<bool>;

    async fn find_by_id(&self, entry_id: &EntryId) -> BlogResult<Option<Entry>>;

    /// Newest entry with `slug` whose display date falls in `[from, to)`
    ///
    /// With `live_at`, entries that are not live at that instant are skipped
    /// before picking, so a draft never shadows a live entry.
    async fn find_by_slug_between(
        &self,
        slug: &Slug,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        live_at: Option<DateTime<Utc>>,
    ) -> BlogResult<Option<Entry>>;

    /// Newest first by display date
    async fn list_live(&self, filter: &LiveFilter, offset: u64, limit: u64)
    -> BlogResult<Vec<Entry>>;

    async fn count_live(&self, filter: &LiveFilter) -> BlogResult<u64>;

    /// Number of live entries carrying each tag
    async fn live_tag_counts(&self, now: DateTime<Utc>) -> BlogResult<Vec<(String, u64)>>;

    /// Most recent entries in any state, newest first by creation date
    async fn list_recent(&self, limit: u64) -> BlogResult<Vec<Entry>>;

    /// Append to the entry's comments; `false` when the entry is gone
    async fn push_comment(&self, entry_id: &EntryId, comment: &Comment) -> BlogResult<bool>;

    /// Remove a comment wherever it is; returns the updated entry
    async fn remove_comment(&self, comment_id: &str) -> BlogResult<Option<Entry>>;
}
