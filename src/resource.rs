//! Resource metadata model

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

use crate::id::ResourceId;

/// Where the content of a resource came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Multipart file upload
    File,
    /// Raw text submitted as JSON
    Paste,
}

/// One ingested piece of content
///
/// Immutable once registered. `storage_path` stays on the server side; clients
/// only ever see `url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub id: ResourceId,
    pub kind: ResourceKind,
    /// Display name: the uploaded filename, or `pasted_content{extension}`
    pub original_name: String,
    /// Canonical extension including the leading dot, possibly empty
    pub extension: String,
    pub storage_path: String,
    pub url: String,
}

impl Resource {
    pub fn new(
        id: ResourceId,
        kind: ResourceKind,
        original_name: String,
        extension: String,
        storage_path: String,
        url_prefix: &str,
    ) -> Self {
        let url = public_url(url_prefix, &storage_path);
        Self {
            id,
            kind,
            original_name,
            extension,
            storage_path,
            url,
        }
    }
}

/// Listing shape: `original_name` is also exposed as `filename`, the key
/// older clients read.
impl Serialize for Resource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Resource", 6)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("type", &self.kind)?;
        state.serialize_field("filename", &self.original_name)?;
        state.serialize_field("original_name", &self.original_name)?;
        state.serialize_field("extension", &self.extension)?;
        state.serialize_field("url", &self.url)?;
        state.end()
    }
}

/// Join the public prefix and a storage path with exactly one slash
pub fn public_url(url_prefix: &str, storage_path: &str) -> String {
    format!("{}/{storage_path}", url_prefix.trim_end_matches('/'))
}
