//! Application Configuration
//!
//! Site identity, paging and markup settings for the blog.

use crate::domain::service::markup::MarkupLanguage;

#[derive(Debug, Clone)]
pub struct BlogConfig {
    pub site_title: String,
    pub site_description: String,
    /// Absolute base URL used for feed links, without trailing slash
    pub site_url: String,
    pub entries_per_page: u64,
    /// Entries in each feed
    pub feed_size: u64,
    /// Entries on the admin dashboard
    pub dashboard_size: u64,
    pub markup_language: MarkupLanguage,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            site_title: "Recent Entries".to_string(),
            site_description: String::new(),
            site_url: "http://localhost:31113".to_string(),
            entries_per_page: 10,
            feed_size: 30,
            dashboard_size: 10,
            markup_language: MarkupLanguage::Markdown,
        }
    }
}

impl BlogConfig {
    pub fn development() -> Self {
        Self::default()
    }

    pub fn with_site_url(mut self, site_url: impl Into<String>) -> Self {
        self.site_url = site_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Absolute URL for a site-relative `path`
    pub fn absolute_url(&self, path: &str) -> String {
        format!("{}/{}", self.site_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}
