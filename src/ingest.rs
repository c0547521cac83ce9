//! Ingestion service
//!
//! Turns a client submission into a registered resource: generate an id,
//! persist the payload, then register the metadata. Registration only happens
//! after the store reports a durable write, so the registry never points at a
//! file that does not exist.

use serde::Serialize;
use std::sync::Arc;
use tokio::io::AsyncRead;

use crate::id::ResourceId;
use crate::registry::ResourceRegistry;
use crate::resource::{Resource, ResourceKind};
use crate::store::{AssetStore, StorageWriteError};

/// Extension used for pastes when the client does not name one
pub const DEFAULT_PASTE_EXTENSION: &str = "html";

const PASTE_NAME: &str = "pasted_content";

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error(transparent)]
    StorageWrite(#[from] StorageWriteError),
    #[error("resource not found: {0}")]
    NotFound(ResourceId),
}

/// What a successful ingestion hands back to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ingested {
    pub id: ResourceId,
    pub url: String,
}

pub struct IngestionService {
    store: Arc<AssetStore>,
    registry: Arc<ResourceRegistry>,
    url_prefix: String,
}

impl IngestionService {
    pub fn new(
        store: Arc<AssetStore>,
        registry: Arc<ResourceRegistry>,
        url_prefix: impl Into<String>,
    ) -> Self {
        Self {
            store,
            registry,
            url_prefix: url_prefix.into(),
        }
    }

    pub fn store(&self) -> &AssetStore {
        &self.store
    }

    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// Store an uploaded file under a fresh id, keeping the extension of
    /// `filename`
    pub async fn ingest_upload<R>(&self, filename: &str, content: R) -> Result<Ingested, IngestError>
    where
        R: AsyncRead + Unpin,
    {
        let extension = extension_of(filename).to_string();
        let id = ResourceId::generate();

        let storage_path = self
            .store
            .write_binary(&id, &extension, content)
            .await
            .inspect_err(|e| tracing::error!(%id, error = %e, "upload could not be stored"))?;

        let resource = Resource::new(
            id,
            ResourceKind::File,
            filename.to_string(),
            extension,
            storage_path,
            &self.url_prefix,
        );
        Ok(self.register(resource).await)
    }

    /// Store pasted text under a fresh id. Any extension is accepted; a
    /// missing leading dot is added.
    pub async fn ingest_paste(
        &self,
        content: &str,
        file_extension: &str,
    ) -> Result<Ingested, IngestError> {
        let extension = normalize_extension(file_extension);
        let id = ResourceId::generate();

        let storage_path = self
            .store
            .write_text(&id, &extension, content)
            .await
            .inspect_err(|e| tracing::error!(%id, error = %e, "paste could not be stored"))?;

        let resource = Resource::new(
            id,
            ResourceKind::Paste,
            format!("{PASTE_NAME}{extension}"),
            extension,
            storage_path,
            &self.url_prefix,
        );
        Ok(self.register(resource).await)
    }

    /// Public URL of a registered resource
    pub async fn resolve_redirect(&self, id: &ResourceId) -> Result<String, IngestError> {
        self.registry
            .get(id)
            .await
            .map(|resource| resource.url)
            .ok_or_else(|| IngestError::NotFound(id.clone()))
    }

    pub async fn list_resources(&self) -> Vec<Resource> {
        self.registry.list_all().await
    }

    async fn register(&self, resource: Resource) -> Ingested {
        let ingested = Ingested {
            id: resource.id.clone(),
            url: resource.url.clone(),
        };
        tracing::info!(
            id = %resource.id,
            kind = ?resource.kind,
            name = %resource.original_name,
            url = %resource.url,
            "resource stored"
        );
        self.registry.insert(resource).await;
        ingested
    }
}

/// Extension of the last path component, including the dot.
///
/// Dots leading the component do not start an extension, so `.bashrc` has
/// none, while `archive.tar.gz` yields `.gz`.
pub fn extension_of(filename: &str) -> &str {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let (Some(dot), Some(stem_start)) = (name.rfind('.'), name.find(|c: char| c != '.')) else {
        return "";
    };
    if dot > stem_start {
        &name[dot..]
    } else {
        ""
    }
}

/// Prepend the separator when the client left it out
pub fn normalize_extension(extension: &str) -> String {
    if extension.starts_with('.') {
        extension.to_string()
    } else {
        format!(".{extension}")
    }
}
