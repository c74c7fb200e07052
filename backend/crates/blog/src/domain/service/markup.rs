//! Markup Rendering
//!
//! Turns user-supplied text into HTML. Raw HTML in the source is always
//! escaped, never passed through.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, html};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::domain::service::html::escape;

static HEADING_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(/?h)[1-6]").expect("valid heading pattern"));

static ANCHOR_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<a(\s[^>]*)?>").expect("valid anchor pattern"));

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n\s*\r?\n").expect("valid paragraph pattern"));

/// Source language for entry content and comments
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkupLanguage {
    #[default]
    Markdown,
    /// Escaped text split into paragraphs
    Plain,
}

impl FromStr for MarkupLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "markdown" => Ok(MarkupLanguage::Markdown),
            "plain" | "none" => Ok(MarkupLanguage::Plain),
            other => Err(format!("unknown markup language {other:?}")),
        }
    }
}

impl fmt::Display for MarkupLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkupLanguage::Markdown => f.write_str("markdown"),
            MarkupLanguage::Plain => f.write_str("plain"),
        }
    }
}

/// Render `text` to HTML
///
/// `small_headings` demotes every heading to `<h5>`; `no_follow` adds
/// `rel="nofollow"` to anchors that do not carry it already.
pub fn markup(text: &str, language: MarkupLanguage, small_headings: bool, no_follow: bool) -> String {
    let mut html = match language {
        MarkupLanguage::Markdown => markdown_to_html(text),
        MarkupLanguage::Plain => plain_to_html(text),
    };

    if small_headings {
        html = shrink_headings(&html);
    }
    if no_follow {
        html = add_nofollow(&html);
    }
    html
}

fn markdown_to_html(text: &str) -> String {
    let parser = Parser::new_ext(text, Options::ENABLE_STRIKETHROUGH).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        other => other,
    });

    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

fn plain_to_html(text: &str) -> String {
    PARAGRAPH_BREAK
        .split(text.trim())
        .filter(|p| !p.trim().is_empty())
        .map(|p| format!("<p>{}</p>\n", escape(p.trim()).replace('\n', "<br />\n")))
        .collect()
}

/// Script-capable schemes become a dead `#` link
fn safe_url(url: CowStr<'_>) -> CowStr<'_> {
    let lowered = url.trim().to_ascii_lowercase();
    if ["javascript:", "vbscript:", "data:"]
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
    {
        CowStr::Borrowed("#")
    } else {
        url
    }
}

pub fn shrink_headings(html: &str) -> String {
    HEADING_TAG.replace_all(html, "<${1}5").into_owned()
}

pub fn add_nofollow(html: &str) -> String {
    ANCHOR_TAG
        .replace_all(html, |caps: &Captures| {
            let attrs = caps.get(1).map_or("", |m| m.as_str());
            if attrs.contains("nofollow") {
                caps[0].to_string()
            } else {
                format!("<a rel=\"nofollow\"{attrs}>")
            }
        })
        .into_owned()
}
