//! Ghost export records and the reader that extracts them

use crate::error::{MigrateError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;

/// Opaque record identifier. Ghost uses string ids, older exports use numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GhostId(String);

impl GhostId {
    pub fn new(id: impl Into<String>) -> Self {
        GhostId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GhostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for GhostId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => GhostId(s),
            Raw::Number(n) => GhostId(n.to_string()),
        })
    }
}

/// Timestamp exactly as it appears in the export.
///
/// Kept as text so the effective date can be reused verbatim in file names
/// and API payloads; parsing happens only where a structured date is needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GhostTimestamp {
    Text(String),
    /// Milliseconds since the Unix epoch (Ghost 0.x exports)
    EpochMillis(i64),
}

impl fmt::Display for GhostTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GhostTimestamp::Text(s) => f.write_str(s),
            GhostTimestamp::EpochMillis(ms) => write!(f, "{}", ms),
        }
    }
}

impl<'de> Deserialize<'de> for GhostTimestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Millis(i64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => GhostTimestamp::Text(s),
            Raw::Millis(ms) => GhostTimestamp::EpochMillis(ms),
        })
    }
}

/// Accept `true`/`false` as well as `0`/`1` for the page flag
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Number(i64),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Bool(b)) => b,
        Some(Raw::Number(n)) => n != 0,
        None => false,
    })
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A post or page as stored in the export
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExportedPost {
    pub id: GhostId,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub html: String,
    #[serde(default)]
    pub published_at: Option<GhostTimestamp>,
    pub created_at: GhostTimestamp,
    #[serde(default, rename = "page", deserialize_with = "flag")]
    page_flag: bool,
    #[serde(default, rename = "type")]
    post_type: Option<String>,
    #[serde(default)]
    pub feature_image: Option<String>,
}

impl ExportedPost {
    /// Whether this record is a static page rather than a blog post
    pub fn is_page(&self) -> bool {
        self.page_flag || self.post_type.as_deref() == Some("page")
    }

    /// The publish date when present, otherwise the creation date
    pub fn effective_date(&self) -> &GhostTimestamp {
        self.published_at.as_ref().unwrap_or(&self.created_at)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExportedTag {
    pub id: GhostId,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}

/// One post-to-tag edge
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PostTagLink {
    pub post_id: GhostId,
    pub tag_id: GhostId,
}

/// The three collections migrated out of a Ghost export
#[derive(Debug, Clone, Default)]
pub struct GhostExport {
    pub posts: Vec<ExportedPost>,
    pub tags: Vec<ExportedTag>,
    pub links: Vec<PostTagLink>,
}

impl GhostExport {
    /// Parse export file contents and pull out `db[0].data.{posts,tags,posts_tags}`
    pub fn from_json(contents: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(contents)
            .map_err(|e| MigrateError::MalformedExport(format!("invalid JSON: {}", e)))?;

        let data = document
            .get("db")
            .ok_or_else(|| missing("db"))?
            .get(0)
            .ok_or_else(|| missing("db[0]"))?
            .get("data")
            .ok_or_else(|| missing("db[0].data"))?;

        Ok(GhostExport {
            posts: collection(data, "posts")?,
            tags: collection(data, "tags")?,
            links: collection(data, "posts_tags")?,
        })
    }
}

fn missing(path: &str) -> MigrateError {
    MigrateError::MalformedExport(format!("missing key '{}'", path))
}

fn collection<T: DeserializeOwned>(data: &Value, key: &str) -> Result<Vec<T>> {
    let raw = data
        .get(key)
        .ok_or_else(|| missing(&format!("db[0].data.{}", key)))?;

    Vec::<T>::deserialize(raw).map_err(|e| {
        MigrateError::MalformedExport(format!("invalid records in db[0].data.{}: {}", key, e))
    })
}
