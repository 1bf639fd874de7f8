//! Inspect export use case

use crate::domain::{BodyFormat, GhostExport, TagIndex, TransformedPost};

/// One line of `inspect` output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSummary {
    pub is_page: bool,
    pub effective_date: String,
    pub slug: String,
    pub title: String,
    pub tags: Vec<String>,
}

/// Join every post with its tags without publishing anything
pub fn inspect(export: &GhostExport) -> Vec<PostSummary> {
    let index = TagIndex::build(&export.tags, &export.links);

    export
        .posts
        .iter()
        .map(|post| {
            let transformed = TransformedPost::from_export(post, &index, BodyFormat::Html);
            PostSummary {
                is_page: transformed.is_page,
                effective_date: transformed.effective_date.to_string(),
                slug: transformed.slug,
                title: transformed.title,
                tags: transformed.tag_names,
            }
        })
        .collect()
}
