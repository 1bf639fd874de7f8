//! Ghost → Write.as migration use case

use crate::application::report::MigrationReport;
use crate::domain::{BodyFormat, GhostExport, MarkdownPost, TagIndex, TransformedPost};
use crate::error::Result;
use crate::infrastructure::config::WriteAsSettings;
use crate::infrastructure::writeas::{NewPost, WriteAsApi, WriteAsSession};
use crate::infrastructure::PostStore;
use std::thread;

/// Service that archives posts as Markdown and publishes them to Write.as
pub struct WriteAsMigrationService<A: WriteAsApi> {
    api: A,
    store: PostStore,
    settings: WriteAsSettings,
}

impl<A: WriteAsApi> WriteAsMigrationService<A> {
    pub fn new(api: A, store: PostStore, settings: WriteAsSettings) -> Self {
        WriteAsMigrationService {
            api,
            store,
            settings,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Write and publish every post in export order, pausing between publications.
    ///
    /// The session logs out on success and on every early return.
    pub fn execute(&self, export: &GhostExport) -> Result<MigrationReport> {
        let mut report = MigrationReport::default();

        self.store.ensure_dir()?;
        let session = WriteAsSession::open(
            &self.api,
            &self.settings.username,
            &self.settings.password,
        )?;

        let index = TagIndex::build(&export.tags, &export.links);
        for (i, post) in export.posts.iter().enumerate() {
            if i > 0 && !self.settings.post_delay.is_zero() {
                tracing::debug!("Waiting {:?} before the next post", self.settings.post_delay);
                thread::sleep(self.settings.post_delay);
            }

            tracing::info!("Extracting post '{}'", post.title);
            let transformed = TransformedPost::from_export(post, &index, BodyFormat::Markdown);
            let markdown = MarkdownPost::new(&transformed);

            let path = self
                .store
                .write(&markdown.filename(), &markdown.file_content())?;
            tracing::info!("Wrote {}", path.display());
            report.files_written += 1;

            let new_post = NewPost {
                title: transformed.title.clone(),
                created: transformed.effective_date.to_string(),
                body: markdown.publish_body(),
            };
            let id = session.publish(&self.settings.publication, &new_post)?;
            tracing::info!(
                "Published '{}' to '{}' (id {})",
                transformed.title,
                self.settings.publication,
                id
            );
            report.posts_published += 1;
        }

        session.close()?;
        Ok(report)
    }
}
