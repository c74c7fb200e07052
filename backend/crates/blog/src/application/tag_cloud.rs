//! Tag Cloud Use Case

use std::sync::Arc;

use chrono::Utc;

use crate::domain::repository::EntryRepository;
use crate::domain::service::tag_cloud::{TagWeight, tag_cloud};
use crate::error::BlogResult;

pub struct TagCloudUseCase<R>
where
    R: EntryRepository,
{
    repo: Arc<R>,
}

impl<R> TagCloudUseCase<R>
where
    R: EntryRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self) -> BlogResult<Vec<TagWeight>> {
        let counts = self.repo.live_tag_counts(Utc::now()).await?;
        Ok(tag_cloud(counts))
    }
}
