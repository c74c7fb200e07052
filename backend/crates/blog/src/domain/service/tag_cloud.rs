//! Tag Cloud
//!
//! Tag frequencies normalised to sum to 1, most frequent first. Ties are
//! broken by tag, also descending.

#[derive(Debug, Clone, PartialEq)]
pub struct TagWeight {
    pub tag: String,
    pub count: u64,
    pub frequency: f64,
}

pub fn tag_cloud(counts: Vec<(String, u64)>) -> Vec<TagWeight> {
    let total: u64 = counts.iter().map(|(_, n)| n).sum();
    if total == 0 {
        return Vec::new();
    }

    let mut weights: Vec<TagWeight> = counts
        .into_iter()
        .filter(|(_, n)| *n > 0)
        .map(|(tag, count)| TagWeight {
            frequency: count as f64 / total as f64,
            tag,
            count,
        })
        .collect();

    weights.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| b.tag.cmp(&a.tag)));
    weights
}
