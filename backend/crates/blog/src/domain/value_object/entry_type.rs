//! Entry Type Value Object
//!
//! The closed set of post kinds. Lookups from paths are case-insensitive.

use std::str::FromStr;

use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    #[display("Text")]
    Text,
    #[display("Link")]
    Link,
    #[display("Image")]
    Image,
    #[display("Video")]
    Video,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown entry type {0:?}")]
pub struct UnknownEntryType(pub String);

impl EntryType {
    pub const ALL: [EntryType; 4] = [
        EntryType::Text,
        EntryType::Link,
        EntryType::Image,
        EntryType::Video,
    ];

    /// Lower-case key used in paths and storage
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Text => "text",
            EntryType::Link => "link",
            EntryType::Image => "image",
            EntryType::Video => "video",
        }
    }

    /// Display labels of every type
    pub fn labels() -> Vec<String> {
        Self::ALL.iter().map(ToString::to_string).collect()
    }
}

impl FromStr for EntryType {
    type Err = UnknownEntryType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == key)
            .ok_or_else(|| UnknownEntryType(s.to_string()))
    }
}
