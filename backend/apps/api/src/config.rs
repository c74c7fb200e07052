//! Application Configuration
//!
//! Everything the binaries read from the environment (after `.env`).

use std::env;
use std::net::SocketAddr;

use anyhow::{Context, bail};
use auth::AuthConfig;
use blog::BlogConfig;
use blog::domain::service::markup::MarkupLanguage;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:31113";
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:40922,http://127.0.0.1:40922";

/// Where entries and users are stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Storage {
    Postgres(String),
    /// `DATABASE_URL=memory`; nothing survives a restart
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage: Storage,
    pub bind_addr: SocketAddr,
    pub frontend_origins: Vec<String>,
    pub auth: AuthConfig,
    pub blog: BlogConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key/value source; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let storage = match var("DATABASE_URL").context("DATABASE_URL must be set")? {
            url if url.eq_ignore_ascii_case("memory") => Storage::Memory,
            url => Storage::Postgres(url),
        };

        let bind_addr = var("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR must be a socket address")?;

        let frontend_origins = var("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let mut auth = match var("SECRET_KEY") {
            Some(secret) => AuthConfig::new(secret.into_bytes()),
            None if cfg!(debug_assertions) => {
                tracing::warn!("SECRET_KEY not set, using a random key");
                AuthConfig::development()
            }
            None => bail!("SECRET_KEY must be set in production"),
        };
        auth.previous_secret_key = var("PREVIOUS_SECRET_KEY").map(String::into_bytes);

        let mut blog = BlogConfig::default();
        if let Some(title) = var("SITE_TITLE") {
            blog.site_title = title;
        }
        if let Some(description) = var("SITE_DESCRIPTION") {
            blog.site_description = description;
        }
        if let Some(url) = var("SITE_URL") {
            blog = blog.with_site_url(url);
        }
        if let Some(per_page) = var("ENTRIES_PER_PAGE") {
            blog.entries_per_page = per_page
                .trim()
                .parse()
                .context("ENTRIES_PER_PAGE must be a positive integer")?;
            if blog.entries_per_page == 0 {
                bail!("ENTRIES_PER_PAGE must be a positive integer");
            }
        }
        if let Some(language) = var("MARKUP_LANGUAGE") {
            blog.markup_language = language
                .parse::<MarkupLanguage>()
                .map_err(anyhow::Error::msg)?;
        }

        Ok(Self {
            storage,
            bind_addr,
            frontend_origins,
            auth,
            blog,
        })
    }
}
