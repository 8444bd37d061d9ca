use std::collections::HashMap;
use std::sync::Arc;

use taxii_store::DocumentStore;

use crate::collections::CollectionStore;
use crate::error::EngineResult;
use crate::filter::ObjectFilter;
use crate::objects::ObjectStore;
use crate::registry::RootRegistry;
use crate::status::StatusLedger;

/// The core components wired over one shared store handle.
///
/// Holds no mutable state of its own; cloning shares the store.
#[derive(Clone, Debug)]
pub struct TaxiiEngine {
    pub registry: RootRegistry,
    pub collections: CollectionStore,
    pub objects: ObjectStore,
    pub status: StatusLedger,
    default_limit: usize,
}

impl TaxiiEngine {
    /// `default_limit` is the page size applied when a request omits `limit`.
    pub fn new(store: Arc<dyn DocumentStore>, default_limit: usize) -> Self {
        let status = StatusLedger::new(Arc::clone(&store));
        Self {
            registry: RootRegistry::new(Arc::clone(&store)),
            collections: CollectionStore::new(Arc::clone(&store)),
            objects: ObjectStore::new(store, status.clone()),
            status,
            default_limit,
        }
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    /// Resolve request query parameters against the configured default limit.
    pub fn resolve_filter(&self, params: &HashMap<String, String>) -> EngineResult<ObjectFilter> {
        ObjectFilter::resolve(params, self.default_limit)
    }
}
