//! Reading a Ghost export from disk

use crate::domain::GhostExport;
use crate::error::Result;
use std::fs;
use std::path::Path;

/// Read and parse the export file at `path`
pub fn read_export(path: &Path) -> Result<GhostExport> {
    let contents = fs::read_to_string(path)?;
    let export = GhostExport::from_json(&contents)?;
    tracing::info!(
        "Read {} posts, {} tags, {} tag links from {}",
        export.posts.len(),
        export.tags.len(),
        export.links.len(),
        path.display()
    );
    Ok(export)
}
