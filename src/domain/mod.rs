//! Domain layer - Export records and the join/transform pipeline

pub mod date;
pub mod export;
pub mod markdown;
pub mod post;
pub mod tags;
pub mod wordpress;

pub use export::{ExportedPost, ExportedTag, GhostExport, GhostId, GhostTimestamp, PostTagLink};
pub use markdown::MarkdownPost;
pub use post::{BodyFormat, TransformedPost};
pub use tags::TagIndex;
pub use wordpress::{Prepared, TagPolicy, WordPressEntry, WordPressTerm};
