// Application state module
// Owns the ingestion service handles shared by every connection

use std::sync::Arc;

use super::types::Config;
use crate::ingest::IngestionService;
use crate::registry::ResourceRegistry;
use crate::store::AssetStore;

/// Application state
pub struct AppState {
    pub config: Config,
    pub ingestion: IngestionService,
}

impl AppState {
    /// Build the store, an empty registry and the ingestion service on top
    pub fn new(config: &Config) -> Self {
        let store = Arc::new(AssetStore::new(
            config.storage.root_dir.clone(),
            config.storage.chunk_size,
        ));
        let registry = Arc::new(ResourceRegistry::new());
        let ingestion = IngestionService::new(store, registry, config.storage.url_prefix.clone());

        Self {
            config: config.clone(),
            ingestion,
        }
    }

    pub const fn access_log_enabled(&self) -> bool {
        self.config.logging.access_log
    }
}
