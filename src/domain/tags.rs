//! Resolving a post's tag ids to tag names

use crate::domain::export::{ExportedTag, GhostId, PostTagLink};
use std::collections::HashMap;

/// Lookup tables built once per run: tag id → name and post id → tag ids.
///
/// Tag ids per post keep the order their links appear in the export.
#[derive(Debug, Default)]
pub struct TagIndex<'a> {
    names: HashMap<&'a GhostId, &'a str>,
    tags_by_post: HashMap<&'a GhostId, Vec<&'a GhostId>>,
}

impl<'a> TagIndex<'a> {
    pub fn build(tags: &'a [ExportedTag], links: &'a [PostTagLink]) -> Self {
        let mut names = HashMap::with_capacity(tags.len());
        for tag in tags {
            // First tag with a given id wins, as a front-to-back scan would
            names.entry(&tag.id).or_insert(tag.name.as_str());
        }

        let mut tags_by_post: HashMap<&GhostId, Vec<&GhostId>> = HashMap::new();
        for link in links {
            tags_by_post.entry(&link.post_id).or_default().push(&link.tag_id);
        }

        TagIndex {
            names,
            tags_by_post,
        }
    }

    /// Tag names for a post in link order. Links to unknown tags are dropped.
    pub fn names_for(&self, post_id: &GhostId) -> Vec<String> {
        self.tags_by_post
            .get(post_id)
            .map(|tag_ids| {
                tag_ids
                    .iter()
                    .filter_map(|tag_id| self.names.get(tag_id))
                    .map(|name| name.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Render tag names as a single line of `#name` tokens
pub fn hashtag_line(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("#{}", name))
        .collect::<Vec<_>>()
        .join(" ")
}
