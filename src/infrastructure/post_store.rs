//! Local Markdown archive written by the Write.as migration

use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_POST_DIR: &str = "posts";

/// Directory that receives one Markdown file per migrated post
#[derive(Debug, Clone)]
pub struct PostStore {
    root: PathBuf,
}

impl PostStore {
    pub fn new(root: PathBuf) -> Self {
        PostStore { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the directory if it does not exist yet
    pub fn ensure_dir(&self) -> Result<()> {
        if self.root.is_dir() {
            tracing::info!("Directory {} already exists", self.root.display());
        } else {
            fs::create_dir_all(&self.root)?;
            tracing::info!("Created directory {}", self.root.display());
        }
        Ok(())
    }

    /// Write a post file, replacing any previous version, and return its path
    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf> {
        let path = self.root.join(filename);
        fs::write(&path, content)?;
        Ok(path)
    }
}
