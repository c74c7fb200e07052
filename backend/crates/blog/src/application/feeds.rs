//! Feeds Use Case
//!
//! RSS and Atom documents over the most recent live entries.

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::BlogConfig;
use crate::domain::entity::entry::Entry;
use crate::domain::repository::{EntryRepository, LiveFilter};
use crate::domain::service::feed::{self, FeedChannel, FeedItem};
use crate::error::BlogResult;

pub const RSS_PATH: &str = "/feeds/rss/";
pub const ATOM_PATH: &str = "/feeds/atom/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedFormat {
    Rss,
    Atom,
}

impl FeedFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            FeedFormat::Rss => "application/rss+xml; charset=utf-8",
            FeedFormat::Atom => "application/atom+xml; charset=utf-8",
        }
    }

    fn path(&self) -> &'static str {
        match self {
            FeedFormat::Rss => RSS_PATH,
            FeedFormat::Atom => ATOM_PATH,
        }
    }
}

pub struct FeedsUseCase<R>
where
    R: EntryRepository,
{
    repo: Arc<R>,
    config: Arc<BlogConfig>,
}

impl<R> FeedsUseCase<R>
where
    R: EntryRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<BlogConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, format: FeedFormat) -> BlogResult<String> {
        let entries = self
            .repo
            .list_live(&LiveFilter::at(Utc::now()), 0, self.config.feed_size)
            .await?;

        let channel = FeedChannel {
            title: self.config.site_title.clone(),
            link: self.config.absolute_url("/"),
            description: self.config.site_description.clone(),
            self_link: self.config.absolute_url(format.path()),
        };
        let items: Vec<FeedItem> = entries.iter().map(|e| self.item(e)).collect();

        Ok(match format {
            FeedFormat::Rss => feed::rss(&channel, &items),
            FeedFormat::Atom => feed::atom(&channel, &items),
        })
    }

    fn item(&self, entry: &Entry) -> FeedItem {
        FeedItem {
            title: entry.title.clone(),
            link: self.config.absolute_url(&entry.permalink().path()),
            author: entry.author.as_ref().map(|a| a.name.clone()),
            published: entry.display_date(),
            updated: entry.updated_at.max(entry.display_date()),
            categories: entry.tags.clone(),
            content_html: entry.rendered_content(self.config.markup_language),
        }
    }
}
