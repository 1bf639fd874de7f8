//! WordPress resources built from the export

use crate::domain::date::parse_timestamp;
use crate::domain::export::ExportedTag;
use crate::domain::post::TransformedPost;
use chrono::NaiveDateTime;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub const TAG_TAXONOMY: &str = "post_tag";
pub const PUBLISH_STATUS: &str = "publish";

/// How exported tags are mapped onto existing WordPress terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TagPolicy {
    /// Create every tag, even if a term with that slug already exists
    #[default]
    Create,
    /// Skip tags whose slug or name already exists on the site
    Reuse,
}

/// A `post_tag` taxonomy term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordPressTerm {
    pub name: String,
    pub slug: Option<String>,
}

impl From<&ExportedTag> for WordPressTerm {
    fn from(tag: &ExportedTag) -> Self {
        WordPressTerm {
            name: tag.name.clone(),
            slug: tag.slug.clone(),
        }
    }
}

/// Content pushed through `wp.newPost`.
///
/// Pages carry only title, body, and status; dates, slugs, and terms are
/// attached to blog posts alone.
#[derive(Debug, Clone, PartialEq)]
pub enum WordPressEntry {
    Post {
        title: String,
        slug: String,
        content: String,
        date: NaiveDateTime,
        tags: Vec<String>,
    },
    Page {
        title: String,
        content: String,
    },
}

impl WordPressEntry {
    pub fn title(&self) -> &str {
        match self {
            WordPressEntry::Post { title, .. } | WordPressEntry::Page { title, .. } => title,
        }
    }

    pub fn post_type(&self) -> &'static str {
        match self {
            WordPressEntry::Post { .. } => "post",
            WordPressEntry::Page { .. } => "page",
        }
    }
}

/// Outcome of preparing one export record for WordPress
#[derive(Debug, Clone, PartialEq)]
pub enum Prepared {
    Ready(WordPressEntry),
    Skipped { title: String, reason: String },
}

/// Build the WordPress resource for a post, skipping posts whose date cannot be parsed
pub fn prepare_entry(post: TransformedPost) -> Prepared {
    if post.is_page {
        return Prepared::Ready(WordPressEntry::Page {
            title: post.title,
            content: post.body,
        });
    }

    match parse_timestamp(&post.effective_date) {
        Ok(date) => Prepared::Ready(WordPressEntry::Post {
            title: post.title,
            slug: post.slug,
            content: post.body,
            date,
            tags: post.tag_names,
        }),
        Err(e) => Prepared::Skipped {
            title: post.title,
            reason: e.to_string(),
        },
    }
}
