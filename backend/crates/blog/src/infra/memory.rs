//! In-Memory Repository Implementation
//!
//! Backs tests and `DATABASE_URL=memory` development runs.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::id::EntryId;
use tokio::sync::RwLock;

use crate::domain::entity::comment::Comment;
use crate::domain::entity::entry::Entry;
use crate::domain::repository::{EntryRepository, LiveFilter};
use crate::domain::value_object::slug::Slug;
use crate::error::BlogResult;

#[derive(Clone, Default)]
pub struct InMemoryEntryRepository {
    entries: Arc<RwLock<HashMap<EntryId, Entry>>>,
}

impl InMemoryEntryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(entries: &mut [Entry]) {
    entries.sort_by(|a, b| {
        b.display_date()
            .cmp(&a.display_date())
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}

impl EntryRepository for InMemoryEntryRepository {
    async fn create(&self, entry: &Entry) -> BlogResult<()> {
        self.entries.write().await.insert(entry.id, entry.clone());
        Ok(())
    }

    async fn update(&self, entry: &Entry) -> BlogResult<()> {
        let mut entries = self.entries.write().await;
        if let Some(stored) = entries.get_mut(&entry.id) {
            let comments = std::mem::take(&mut stored.comments);
            *stored = Entry {
                comments,
                ..entry.clone()
            };
        }
        Ok(())
    }

    async fn delete(&self, entry_id: &EntryId) -> BlogResult<bool> {
        Ok(self.entries.write().await.remove(entry_id).is_some())
    }

    async fn find_by_id(&self, entry_id: &EntryId) -> BlogResult<Option<Entry>> {
        Ok(self.entries.read().await.get(entry_id).cloned())
    }

    async fn find_by_slug_between(
        &self,
        slug: &Slug,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        live_at: Option<DateTime<Utc>>,
    ) -> BlogResult<Option<Entry>> {
        let entries = self.entries.read().await;
        let mut found: Vec<Entry> = entries
            .values()
            .filter(|e| &e.slug == slug && (from..to).contains(&e.display_date()))
            .filter(|e| live_at.is_none_or(|now| e.is_live(now)))
            .cloned()
            .collect();
        newest_first(&mut found);
        Ok(found.into_iter().next())
    }

    async fn list_live(
        &self,
        filter: &LiveFilter,
        offset: u64,
        limit: u64,
    ) -> BlogResult<Vec<Entry>> {
        let entries = self.entries.read().await;
        let mut live: Vec<Entry> = entries
            .values()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        newest_first(&mut live);
        Ok(live
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count_live(&self, filter: &LiveFilter) -> BlogResult<u64> {
        let entries = self.entries.read().await;
        Ok(entries.values().filter(|e| filter.matches(e)).count() as u64)
    }

    async fn live_tag_counts(&self, now: DateTime<Utc>) -> BlogResult<Vec<(String, u64)>> {
        let entries = self.entries.read().await;
        let mut counts: HashMap<String, u64> = HashMap::new();
        for entry in entries.values().filter(|e| e.is_live(now)) {
            for tag in &entry.tags {
                *counts.entry(tag.clone()).or_default() += 1;
            }
        }
        Ok(counts.into_iter().collect())
    }

    async fn list_recent(&self, limit: u64) -> BlogResult<Vec<Entry>> {
        let entries = self.entries.read().await;
        let mut all: Vec<Entry> = entries.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all.truncate(limit as usize);
        Ok(all)
    }

    async fn push_comment(&self, entry_id: &EntryId, comment: &Comment) -> BlogResult<bool> {
        let mut entries = self.entries.write().await;
        match entries.get_mut(entry_id) {
            Some(entry) => {
                entry.comments.push(comment.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove_comment(&self, comment_id: &str) -> BlogResult<Option<Entry>> {
        let mut entries = self.entries.write().await;
        let Some(entry) = entries
            .values_mut()
            .find(|e| e.find_comment(comment_id).is_some())
        else {
            return Ok(None);
        };
        entry.comments.retain(|c| c.id != comment_id);
        entry.updated_at = Utc::now();
        Ok(Some(entry.clone()))
    }
}
