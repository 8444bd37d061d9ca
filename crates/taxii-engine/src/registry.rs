//! Existence checks and metadata lookup for API roots, plus the discovery
//! document.

use std::sync::Arc;

use taxii_store::DocumentStore;
use taxii_types::{ApiRootInfo, Discovery};

use crate::error::EngineResult;

#[derive(Clone)]
pub struct RootRegistry {
    store: Arc<dyn DocumentStore>,
}

impl RootRegistry {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Whether a namespace has been provisioned for `root`.
    pub async fn root_exists(&self, root: &str) -> EngineResult<bool> {
        Ok(self.store.namespace_exists(root).await?)
    }

    /// Whether `collection_id` exists in `root`. False when the root itself
    /// is unknown.
    pub async fn collection_exists(&self, root: &str, collection_id: &str) -> EngineResult<bool> {
        Ok(self.store.collection(root, collection_id).await?.is_some())
    }

    /// The discovery document with `api_roots` narrowed to the URLs that
    /// resolve to a registered root. `None` if no discovery record exists.
    pub async fn discovery(&self) -> EngineResult<Option<Discovery>> {
        let Some(mut discovery) = self.store.discovery().await? else {
            return Ok(None);
        };
        let resolved = self.store.api_roots_by_url(&discovery.api_roots).await?;
        if resolved.len() != discovery.api_roots.len() {
            tracing::debug!(
                configured = discovery.api_roots.len(),
                resolved = resolved.len(),
                "dropping unregistered api roots from discovery"
            );
        }
        discovery.api_roots = resolved.into_iter().map(|r| r.url).collect();
        Ok(Some(discovery))
    }

    /// Public metadata for one root, without its internal url/name keys.
    pub async fn root_information(&self, root: &str) -> EngineResult<Option<ApiRootInfo>> {
        Ok(self.store.api_root_by_name(root).await?.map(|r| r.info))
    }
}

impl std::fmt::Debug for RootRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RootRegistry").finish_non_exhaustive()
    }
}
