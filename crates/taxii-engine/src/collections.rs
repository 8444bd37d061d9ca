use std::sync::Arc;

use taxii_store::DocumentStore;
use taxii_types::Collection;

use crate::error::EngineResult;

/// Read access to collection metadata per API root.
#[derive(Clone)]
pub struct CollectionStore {
    store: Arc<dyn DocumentStore>,
}

impl CollectionStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Every collection in an API root, in provisioning order.
    pub async fn list(&self, root: &str) -> EngineResult<Vec<Collection>> {
        Ok(self.store.collections(root).await?)
    }

    pub async fn get(&self, root: &str, id: &str) -> EngineResult<Option<Collection>> {
        Ok(self.store.collection(root, id).await?)
    }
}

impl std::fmt::Debug for CollectionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionStore").finish_non_exhaustive()
    }
}
