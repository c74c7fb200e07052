//! Tags
//!
//! Tags are stored normalized: lower case, spaces turned into `-`, anything
//! outside `a-z 0-9 _ -` dropped. Empty results are discarded.

pub const TAG_MAX_LENGTH: usize = 50;

/// Normalize one tag; `None` when nothing survives
pub fn normalize_tag(raw: &str) -> Option<String> {
    let tag: String = raw
        .trim()
        .to_lowercase()
        .replace(' ', "-")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_' || *c == '-')
        .collect();

    (!tag.is_empty()).then_some(tag)
}

/// Normalize a list of tags, dropping empties and duplicates (first wins)
pub fn normalize_tags<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.into_iter().filter_map(|t| normalize_tag(t.as_ref())) {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

/// Split free-form admin input: on commas when there is one, else on
/// whitespace
pub fn split_tag_input(input: &str) -> Vec<String> {
    let input = input.to_lowercase();
    if input.contains(',') {
        input.split(',').map(|t| t.trim().to_string()).collect()
    } else {
        input.split_whitespace().map(str::to_string).collect()
    }
}

/// Inverse of [`split_tag_input`] for edit forms
pub fn join_tags(tags: &[String]) -> String {
    tags.join(", ")
}
