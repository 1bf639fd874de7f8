//! Joining a post with its tags and preparing its body for a destination

use crate::domain::export::{ExportedPost, GhostTimestamp};
use crate::domain::markdown::html_to_markdown;
use crate::domain::tags::TagIndex;

/// Body representation a destination expects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    /// HTML exactly as exported
    Html,
    /// HTML converted to Markdown
    Markdown,
}

/// A post after tag resolution and body conversion
#[derive(Debug, Clone, PartialEq)]
pub struct TransformedPost {
    pub title: String,
    pub slug: String,
    pub effective_date: GhostTimestamp,
    pub tag_names: Vec<String>,
    pub body: String,
    pub feature_image: Option<String>,
    pub is_page: bool,
}

impl TransformedPost {
    pub fn from_export(post: &ExportedPost, tags: &TagIndex<'_>, format: BodyFormat) -> Self {
        let body = match format {
            BodyFormat::Html => post.html.clone(),
            BodyFormat::Markdown => html_to_markdown(&post.html),
        };

        TransformedPost {
            title: post.title.clone(),
            slug: post.slug.clone(),
            effective_date: post.effective_date().clone(),
            tag_names: tags.names_for(&post.id),
            body,
            feature_image: post
                .feature_image
                .as_ref()
                .filter(|url| !url.trim().is_empty())
                .cloned(),
            is_page: post.is_page(),
        }
    }
}
