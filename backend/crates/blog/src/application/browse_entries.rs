//! Browse Entries Use Case
//!
//! Paginated listings of live entries: recent, by type, and by tag.

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::BlogConfig;
use crate::domain::entity::entry::Entry;
use crate::domain::repository::{EntryRepository, LiveFilter};
use crate::domain::service::pagination::{Page, Paginator};
use crate::domain::value_object::entry_type::EntryType;
use crate::domain::value_object::tag::normalize_tag;
use crate::error::BlogResult;

#[derive(Debug, Clone)]
pub struct EntryListing {
    pub title: String,
    pub entry_type: Option<EntryType>,
    pub tag: Option<String>,
    pub page: Page<Entry>,
}

pub struct BrowseEntriesUseCase<R>
where
    R: EntryRepository,
{
    repo: Arc<R>,
    config: Arc<BlogConfig>,
}

impl<R> BrowseEntriesUseCase<R>
where
    R: EntryRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<BlogConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn recent(&self, page: Option<&str>) -> BlogResult<EntryListing> {
        let page = self.list(LiveFilter::at(Utc::now()), page).await?;
        Ok(EntryListing {
            title: "Recent Entries".to_string(),
            entry_type: None,
            tag: None,
            page,
        })
    }

    /// Unknown types are an error, not an empty listing
    pub async fn by_type(&self, entry_type: &str, page: Option<&str>) -> BlogResult<EntryListing> {
        let entry_type: EntryType = entry_type.parse()?;
        let page = self
            .list(LiveFilter::at(Utc::now()).with_type(entry_type), page)
            .await?;
        Ok(EntryListing {
            title: format!("{} Entries", entry_type),
            entry_type: Some(entry_type),
            tag: None,
            page,
        })
    }

    pub async fn tagged(&self, tag: &str, page: Option<&str>) -> BlogResult<EntryListing> {
        let tag = normalize_tag(tag).unwrap_or_default();
        let page = self
            .list(LiveFilter::at(Utc::now()).with_tag(tag.clone()), page)
            .await?;
        Ok(EntryListing {
            title: format!("Entries Tagged \"{}\"", tag),
            entry_type: None,
            tag: Some(tag),
            page,
        })
    }

    async fn list(&self, filter: LiveFilter, page: Option<&str>) -> BlogResult<Page<Entry>> {
        let total = self.repo.count_live(&filter).await?;
        let paginator = Paginator::new(total, self.config.entries_per_page);
        let number = paginator.resolve(page);

        let items = if total == 0 {
            Vec::new()
        } else {
            self.repo
                .list_live(&filter, paginator.offset(number), paginator.per_page)
                .await?
        };

        tracing::debug!(
            total,
            page = number,
            entry_type = ?filter.entry_type,
            tag = ?filter.tag,
            "Listed live entries"
        );
        Ok(paginator.page(number, items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{live_text_entry, use_case_setup};
    use crate::error::BlogError;

    #[tokio::test]
    async fn test_recent_pages() {
        let (repo, config) = use_case_setup();
        for i in 0..12 {
            repo.create(&live_text_entry(&format!("post-{i}"), i)).await.unwrap();
        }
        let use_case = BrowseEntriesUseCase::new(repo, config);

        let first = use_case.recent(None).await.unwrap();
        assert_eq!(first.page.items.len(), 10);
        assert_eq!(first.page.items[0].slug.as_str(), "post-0");
        assert!(first.page.has_next());

        let last = use_case.recent(Some("99")).await.unwrap();
        assert_eq!(last.page.number, 2);
        assert_eq!(last.page.items.len(), 2);
    }

    #[tokio::test]
    async fn test_by_type() {
        let (repo, config) = use_case_setup();
        repo.create(&live_text_entry("a", 1)).await.unwrap();
        let use_case = BrowseEntriesUseCase::new(repo, config);

        let listing = use_case.by_type("TEXT", None).await.unwrap();
        assert_eq!(listing.title, "Text Entries");
        assert_eq!(listing.page.total, 1);

        let listing = use_case.by_type("link", None).await.unwrap();
        assert_eq!(listing.page.total, 0);
        assert_eq!(listing.page.number, 1);

        assert!(matches!(
            use_case.by_type("quote", None).await,
            Err(BlogError::UnknownEntryType(_))
        ));
    }

    #[tokio::test]
    async fn test_tagged_normalises_tag() {
        let (repo, config) = use_case_setup();
        repo.create(&live_text_entry("a", 1).with_tags(vec!["web-dev".into()]))
            .await
            .unwrap();
        let use_case = BrowseEntriesUseCase::new(repo, config);

        let listing = use_case.tagged(" Web Dev ", None).await.unwrap();
        assert_eq!(listing.tag.as_deref(), Some("web-dev"));
        assert_eq!(listing.page.total, 1);
        assert_eq!(listing.title, "Entries Tagged \"web-dev\"");
    }
}
