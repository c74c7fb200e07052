//! Media embedding for link, image and video entries

use url::Url;

use crate::domain::service::html::escape;

/// `<p>Link: <a href=…>…</a></p>` for link entries without a description
pub fn link_html(link_url: &str) -> String {
    let url = escape(link_url);
    format!("<p>Link: <a href=\"{url}\">{url}</a></p>")
}

pub fn image_html(image_url: &str) -> String {
    format!("<img src=\"{}\" />", escape(image_url))
}

/// YouTube watch links become an iframe; anything else is a plain
/// `<video>` element
pub fn video_html(video_url: &str) -> String {
    match youtube_id(video_url) {
        Some(id) => format!(
            "<iframe width=\"560\" height=\"315\" src=\"https://www.youtube.com/embed/{id}\" \
             frameborder=\"0\" allowfullscreen></iframe>"
        ),
        None => format!(
            "<video controls src=\"{}\"></video>",
            escape(video_url)
        ),
    }
}

/// Video id from `youtube.com/watch?v=…`, `youtube.com/embed/…` or
/// `youtu.be/…`
pub fn youtube_id(video_url: &str) -> Option<String> {
    let url = Url::parse(video_url).ok()?;
    let host = url.host_str()?.trim_start_matches("www.").trim_start_matches("m.");

    let id = match host {
        "youtube.com" => match url.path() {
            "/watch" => url
                .query_pairs()
                .find(|(k, _)| k == "v")
                .map(|(_, v)| v.into_owned()),
            path => path.strip_prefix("/embed/").map(str::to_string),
        },
        "youtu.be" => url
            .path_segments()
            .and_then(|mut segments| segments.next())
            .map(str::to_string),
        _ => None,
    }?;

    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    valid.then_some(id)
}
