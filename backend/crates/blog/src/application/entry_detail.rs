//! Entry Detail Use Case
//!
//! Resolves a permalink (day + slug) to its entry.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::entity::entry::Entry;
use crate::domain::repository::EntryRepository;
use crate::domain::value_object::permalink::Permalink;
use crate::error::{BlogError, BlogResult};

pub struct EntryDetailUseCase<R>
where
    R: EntryRepository,
{
    repo: Arc<R>,
}

impl<R> EntryDetailUseCase<R>
where
    R: EntryRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Entries that are not live are only found when `include_hidden` is
    /// set (staff preview)
    pub async fn execute(&self, permalink: &Permalink, include_hidden: bool) -> BlogResult<Entry> {
        let (from, to) = permalink.day_bounds();
        let live_at = (!include_hidden).then(Utc::now);
        self.repo
            .find_by_slug_between(&permalink.slug, from, to, live_at)
            .await?
            .ok_or_else(|| {
                tracing::debug!(slug = %permalink.slug, "No visible entry at permalink");
                BlogError::EntryNotFound
            })
    }
}
