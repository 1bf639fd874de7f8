//! Ghost → WordPress migration use case

use crate::application::report::MigrationReport;
use crate::domain::wordpress::{prepare_entry, TAG_TAXONOMY};
use crate::domain::{
    BodyFormat, ExportedTag, GhostExport, Prepared, TagIndex, TagPolicy, TransformedPost,
    WordPressTerm,
};
use crate::error::Result;
use crate::infrastructure::WordPressApi;
use std::collections::HashSet;

/// Service that pushes an export's tags, posts, and pages to WordPress
pub struct WordPressMigrationService<A: WordPressApi> {
    api: A,
    tag_policy: TagPolicy,
}

impl<A: WordPressApi> WordPressMigrationService<A> {
    pub fn new(api: A, tag_policy: TagPolicy) -> Self {
        WordPressMigrationService { api, tag_policy }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Create all tags, then publish every post in export order.
    ///
    /// Posts with an unparseable date are skipped; any remote failure aborts the run.
    pub fn execute(&self, export: &GhostExport) -> Result<MigrationReport> {
        let mut report = MigrationReport::default();

        self.migrate_tags(&export.tags, &mut report)?;

        let index = TagIndex::build(&export.tags, &export.links);
        for post in &export.posts {
            let transformed = TransformedPost::from_export(post, &index, BodyFormat::Html);

            match prepare_entry(transformed) {
                Prepared::Ready(entry) => {
                    let id = self.api.new_post(&entry)?;
                    tracing::info!(
                        "Published {} '{}' (id {})",
                        entry.post_type(),
                        entry.title(),
                        id
                    );
                    if post.is_page() {
                        report.pages_published += 1;
                    } else {
                        report.posts_published += 1;
                    }
                }
                Prepared::Skipped { title, reason } => {
                    tracing::warn!("Skipping post '{}': {}", title, reason);
                    report.skip(title, reason);
                }
            }
        }

        Ok(report)
    }

    fn migrate_tags(&self, tags: &[ExportedTag], report: &mut MigrationReport) -> Result<()> {
        let existing = match self.tag_policy {
            TagPolicy::Create => HashSet::new(),
            TagPolicy::Reuse => self.existing_term_keys()?,
        };

        for tag in tags {
            let term = WordPressTerm::from(tag);
            if is_existing(&existing, &term) {
                tracing::info!("Reusing existing tag '{}'", term.name);
                report.tags_reused += 1;
                continue;
            }

            let id = self.api.new_term(&term)?;
            tracing::info!("Created tag '{}' (id {})", term.name, id);
            report.tags_created += 1;
        }

        Ok(())
    }

    /// Lowercased names and slugs of the terms already on the site
    fn existing_term_keys(&self) -> Result<HashSet<String>> {
        let terms = self.api.existing_terms(TAG_TAXONOMY)?;
        tracing::info!("Found {} existing tags", terms.len());

        Ok(terms
            .into_iter()
            .flat_map(|term| {
                let mut keys = vec![term.name.to_lowercase()];
                keys.extend(term.slug.map(|slug| slug.to_lowercase()));
                keys
            })
            .collect())
    }
}

fn is_existing(existing: &HashSet<String>, term: &WordPressTerm) -> bool {
    existing.contains(&term.name.to_lowercase())
        || term
            .slug
            .as_ref()
            .is_some_and(|slug| existing.contains(&slug.to_lowercase()))
}
