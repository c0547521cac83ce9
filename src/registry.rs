//! Resource registry
//!
//! Volatile index of every successfully ingested resource, keyed by id and
//! kept in insertion order. It starts empty on every process start; files
//! written by an earlier run stay on disk but are no longer listed.

use indexmap::IndexMap;
use tokio::sync::RwLock;

use crate::id::ResourceId;
use crate::resource::Resource;

#[derive(Debug, Default)]
pub struct ResourceRegistry {
    entries: RwLock<IndexMap<ResourceId, Resource>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource.
    ///
    /// Ids come from a 128-bit random space, so a duplicate means a bug in the
    /// caller rather than bad input.
    pub async fn insert(&self, resource: Resource) {
        let mut entries = self.entries.write().await;
        let id = resource.id.clone();
        let previous = entries.insert(id, resource);
        assert!(previous.is_none(), "resource id registered twice");
    }

    pub async fn get(&self, id: &ResourceId) -> Option<Resource> {
        self.entries.read().await.get(id).cloned()
    }

    /// All resources in insertion order
    pub async fn list_all(&self) -> Vec<Resource> {
        self.entries.read().await.values().cloned().collect()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ResourceKind;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn resource(id: &str) -> Resource {
        Resource::new(
            ResourceId::from(id),
            ResourceKind::File,
            format!("{id}.txt"),
            ".txt".to_string(),
            format!("{id}.txt"),
            "/resources",
        )
    }

    #[tokio::test]
    async fn test_get_and_missing() {
        let registry = ResourceRegistry::new();
        registry.insert(resource("a")).await;

        let found = registry.get(&ResourceId::from("a")).await.unwrap();
        assert_eq!(found.url, "/resources/a.txt");
        assert!(registry.get(&ResourceId::from("b")).await.is_none());
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let registry = ResourceRegistry::new();
        for id in ["z", "a", "m"] {
            registry.insert(resource(id)).await;
        }

        let ids: Vec<_> = registry
            .list_all()
            .await
            .into_iter()
            .map(|r| r.id.into_inner())
            .collect();
        assert_eq!(ids, ["z", "a", "m"]);
    }

    #[tokio::test]
    #[should_panic(expected = "registered twice")]
    async fn test_duplicate_id_panics() {
        let registry = ResourceRegistry::new();
        registry.insert(resource("a")).await;
        registry.insert(resource("a")).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts() {
        let registry = Arc::new(ResourceRegistry::new());
        let handles: Vec<_> = (0..100)
            .map(|i| {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move { registry.insert(resource(&format!("r{i}"))).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let all = registry.list_all().await;
        assert_eq!(all.len(), 100);
        let unique: HashSet<_> = all.iter().map(|r| r.id.clone()).collect();
        assert_eq!(unique.len(), 100);
    }
}
