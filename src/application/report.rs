//! Outcome of a completed migration run

/// A post left out of the migration, with the reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPost {
    pub title: String,
    pub reason: String,
}

/// Counts collected while a migration runs to completion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub tags_created: usize,
    pub tags_reused: usize,
    pub posts_published: usize,
    pub pages_published: usize,
    pub files_written: usize,
    pub skipped: Vec<SkippedPost>,
}

impl MigrationReport {
    pub fn skip(&mut self, title: impl Into<String>, reason: impl Into<String>) {
        self.skipped.push(SkippedPost {
            title: title.into(),
            reason: reason.into(),
        });
    }
}
