//! RSS 2.0 and Atom 1.0 documents

use std::fmt::Write;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::domain::service::html::escape;

#[derive(Debug, Clone)]
pub struct FeedChannel {
    pub title: String,
    /// Absolute URL of the site front page
    pub link: String,
    pub description: String,
    /// Absolute URL of the feed itself
    pub self_link: String,
}

#[derive(Debug, Clone)]
pub struct FeedItem {
    pub title: String,
    /// Absolute permalink, also used as the item id
    pub link: String,
    pub author: Option<String>,
    pub published: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub categories: Vec<String>,
    pub content_html: String,
}

pub fn rss(channel: &FeedChannel, items: &[FeedItem]) -> String {
    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    xml.push_str("<rss version=\"2.0\" xmlns:atom=\"http://www.w3.org/2005/Atom\" xmlns:dc=\"http://purl.org/dc/elements/1.1/\">\n<channel>\n");
    let _ = writeln!(xml, "<title>{}</title>", escape(&channel.title));
    let _ = writeln!(xml, "<link>{}</link>", escape(&channel.link));
    let _ = writeln!(xml, "<description>{}</description>", escape(&channel.description));
    let _ = writeln!(
        xml,
        "<atom:link href=\"{}\" rel=\"self\"></atom:link>",
        escape(&channel.self_link)
    );
    xml.push_str("<language>en</language>\n");
    if let Some(latest) = items.iter().map(|i| i.published).max() {
        let _ = writeln!(xml, "<lastBuildDate>{}</lastBuildDate>", latest.to_rfc2822());
    }

    for item in items {
        xml.push_str("<item>\n");
        let _ = writeln!(xml, "<title>{}</title>", escape(&item.title));
        let _ = writeln!(xml, "<link>{}</link>", escape(&item.link));
        let _ = writeln!(xml, "<description>{}</description>", escape(&item.content_html));
        if let Some(author) = &item.author {
            let _ = writeln!(xml, "<dc:creator>{}</dc:creator>", escape(author));
        }
        let _ = writeln!(xml, "<pubDate>{}</pubDate>", item.published.to_rfc2822());
        let _ = writeln!(xml, "<guid>{}</guid>", escape(&item.link));
        for category in &item.categories {
            let _ = writeln!(xml, "<category>{}</category>", escape(category));
        }
        xml.push_str("</item>\n");
    }

    xml.push_str("</channel>\n</rss>\n");
    xml
}

pub fn atom(channel: &FeedChannel, items: &[FeedItem]) -> String {
    let updated = items
        .iter()
        .map(|i| i.updated)
        .max()
        .unwrap_or_else(Utc::now);

    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    xml.push_str("<feed xmlns=\"http://www.w3.org/2005/Atom\" xml:lang=\"en\">\n");
    let _ = writeln!(xml, "<title>{}</title>", escape(&channel.title));
    let _ = writeln!(xml, "<link href=\"{}\" rel=\"alternate\"></link>", escape(&channel.link));
    let _ = writeln!(xml, "<link href=\"{}\" rel=\"self\"></link>", escape(&channel.self_link));
    let _ = writeln!(xml, "<id>{}</id>", escape(&channel.link));
    let _ = writeln!(xml, "<updated>{}</updated>", rfc3339(updated));
    if !channel.description.is_empty() {
        let _ = writeln!(xml, "<subtitle>{}</subtitle>", escape(&channel.description));
    }

    for item in items {
        xml.push_str("<entry>\n");
        let _ = writeln!(xml, "<title>{}</title>", escape(&item.title));
        let _ = writeln!(xml, "<link href=\"{}\" rel=\"alternate\"></link>", escape(&item.link));
        let _ = writeln!(xml, "<published>{}</published>", rfc3339(item.published));
        let _ = writeln!(xml, "<updated>{}</updated>", rfc3339(item.updated));
        if let Some(author) = &item.author {
            let _ = writeln!(xml, "<author><name>{}</name></author>", escape(author));
        }
        let _ = writeln!(xml, "<id>{}</id>", escape(&item.link));
        let _ = writeln!(xml, "<summary type=\"html\">{}</summary>", escape(&item.content_html));
        for category in &item.categories {
            let _ = writeln!(xml, "<category term=\"{}\"></category>", escape(category));
        }
        xml.push_str("</entry>\n");
    }

    xml.push_str("</feed>\n");
    xml
}

fn rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn channel() -> FeedChannel {
        FeedChannel {
            title: "Notes & Links".into(),
            link: "http://example.com/".into(),
            description: "".into(),
            self_link: "http://example.com/feeds/rss/".into(),
        }
    }

    fn item() -> FeedItem {
        let at = Utc.with_ymd_and_hms(2010, 1, 5, 12, 30, 0).unwrap();
        FeedItem {
            title: "Hello <World>".into(),
            link: "http://example.com/2010/jan/05/hello/".into(),
            author: Some("Test Editor".into()),
            published: at,
            updated: at,
            categories: vec!["rust".into()],
            content_html: "<p>Hi</p>".into(),
        }
    }

    #[test]
    fn test_rss() {
        let xml = rss(&channel(), &[item()]);
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(xml.contains("<title>Notes &amp; Links</title>"));
        assert!(xml.contains("<title>Hello &lt;World&gt;</title>"));
        assert!(xml.contains("<description>&lt;p&gt;Hi&lt;/p&gt;</description>"));
        assert!(xml.contains("<pubDate>Tue, "));
        assert!(xml.contains("Jan 2010 12:30:00 +0000</pubDate>"));
        assert!(xml.contains("<dc:creator>Test Editor</dc:creator>"));
        assert!(xml.contains("<guid>http://example.com/2010/jan/05/hello/</guid>"));
        assert!(xml.contains("<category>rust</category>"));
        assert!(xml.trim_end().ends_with("</rss>"));
    }

    #[test]
    fn test_atom() {
        let xml = atom(&channel(), &[item()]);
        assert!(xml.contains("<feed xmlns=\"http://www.w3.org/2005/Atom\""));
        assert!(xml.contains("<updated>2010-01-05T12:30:00Z</updated>"));
        assert!(xml.contains("<published>2010-01-05T12:30:00Z</published>"));
        assert!(xml.contains("<author><name>Test Editor</name></author>"));
        assert!(xml.contains("<summary type=\"html\">&lt;p&gt;Hi&lt;/p&gt;</summary>"));
        assert!(!xml.contains("<subtitle>"));
        assert!(xml.trim_end().ends_with("</feed>"));
    }

    #[test]
    fn test_empty_feeds_are_well_formed() {
        assert!(rss(&channel(), &[]).contains("<channel>"));
        assert!(!rss(&channel(), &[]).contains("<item>"));
        assert!(atom(&channel(), &[]).contains("<updated>"));
    }
}
