//! Read, write, and delete paths over STIX objects in a collection.

use std::sync::Arc;

use taxii_store::{DocumentStore, ObjectQuery, PageWindow};
use taxii_types::{Bundle, Manifest, ObjectRecord, StatusKind, StatusRecord, DEFAULT_SPEC_VERSION};

use crate::envelope::Page;
use crate::error::EngineResult;
use crate::filter::ObjectFilter;
use crate::manifest;
use crate::status::{StatusLedger, StatusRead};

/// Outcome of [`ObjectStore::add_objects`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Every entry was persisted; carries the status record as returned by
    /// its first read.
    Accepted(StatusRecord),
    /// The bundle had no entries. No status record was created.
    NothingToIngest,
    /// The target collection does not exist. A pending status record was
    /// already created and is left behind.
    CollectionMissing { status_id: String },
}

impl IngestOutcome {
    pub fn status(&self) -> Option<&StatusRecord> {
        match self {
            Self::Accepted(status) => Some(status),
            _ => None,
        }
    }
}

/// The object engine for every collection of every API root.
#[derive(Clone)]
pub struct ObjectStore {
    store: Arc<dyn DocumentStore>,
    ledger: StatusLedger,
}

impl ObjectStore {
    pub fn new(store: Arc<dyn DocumentStore>, ledger: StatusLedger) -> Self {
        Self { store, ledger }
    }

    /// Objects in a collection matching `filter`, one page at a time.
    pub async fn list_objects(
        &self,
        root: &str,
        collection_id: &str,
        filter: &ObjectFilter,
    ) -> EngineResult<Page<ObjectRecord>> {
        self.fetch_page(root, &filter.query(collection_id), filter).await
    }

    /// Every stored version of one object matching `filter`.
    pub async fn get_object(
        &self,
        root: &str,
        collection_id: &str,
        object_id: &str,
        filter: &ObjectFilter,
    ) -> EngineResult<Page<ObjectRecord>> {
        let query = filter.query(collection_id).with_object_id(object_id);
        self.fetch_page(root, &query, filter).await
    }

    /// Manifest versions of one object. Only `spec_version` narrows the
    /// result; a `version` filter would trivially select itself.
    pub async fn object_versions(
        &self,
        root: &str,
        collection_id: &str,
        object_id: &str,
        filter: &ObjectFilter,
    ) -> EngineResult<Page<String>> {
        let query = ObjectQuery::collection(collection_id)
            .with_object_id(object_id)
            .with_spec_version(filter.spec_version.clone());
        let page = self.fetch_page(root, &query, filter).await?;
        Ok(page.map(|record| record.manifest.version))
    }

    /// Manifests of the objects in a collection matching `filter`.
    pub async fn list_manifests(
        &self,
        root: &str,
        collection_id: &str,
        filter: &ObjectFilter,
    ) -> EngineResult<Page<Manifest>> {
        let page = self.fetch_page(root, &filter.query(collection_id), filter).await?;
        Ok(page.map(|record| record.manifest))
    }

    /// Delete the first stored row of an object matching `filter`.
    /// Returns 0 or 1.
    pub async fn delete_object(
        &self,
        root: &str,
        collection_id: &str,
        object_id: &str,
        filter: &ObjectFilter,
    ) -> EngineResult<u64> {
        let query = filter.query(collection_id).with_object_id(object_id);
        let deleted = self.store.delete_object(root, &query).await?;
        tracing::debug!(root, collection_id, object_id, deleted, "delete object");
        Ok(deleted)
    }

    /// Ingest a bundle into a collection.
    ///
    /// Each bundle entry is persisted as one row, in order, with a freshly
    /// generated manifest, its owning collection stamped, and its
    /// `spec_version` defaulted. The returned status has already been read
    /// once.
    pub async fn add_objects(
        &self,
        root: &str,
        collection_id: &str,
        bundle: Bundle,
    ) -> EngineResult<IngestOutcome> {
        if bundle.is_empty() {
            return Ok(IngestOutcome::NothingToIngest);
        }

        let status = self.ledger.create(root).await?;

        if self.store.collection(root, collection_id).await?.is_none() {
            tracing::warn!(
                root,
                collection_id,
                status_id = %status.id,
                "ingest target collection missing; pending status left behind"
            );
            return Ok(IngestOutcome::CollectionMissing {
                status_id: status.id,
            });
        }

        let count = bundle.len() as u64;
        for mut entry in bundle.objects {
            let manifest = manifest::generate(entry.first_object(), &entry.entry_type);
            if entry.spec_version().is_none() {
                entry.spec_version = Some(DEFAULT_SPEC_VERSION.to_string());
            }
            let record = ObjectRecord {
                entry,
                collection_id: collection_id.to_string(),
                manifest,
            };
            self.store.insert_object(root, &record).await?;
        }

        self.ledger.complete(root, &status.id, count).await?;
        tracing::info!(root, collection_id, status_id = %status.id, count, "bundle ingested");

        match self.ledger.read(root, &status.id).await? {
            StatusRead::Record(record) => Ok(IngestOutcome::Accepted(record)),
            StatusRead::Deleted => {
                // Consumed concurrently before we could read it back.
                let mut completed = status;
                completed.status = StatusKind::Success;
                completed.total_count = count;
                completed.success_count = count;
                Ok(IngestOutcome::Accepted(completed))
            }
        }
    }

    async fn fetch_page(
        &self,
        root: &str,
        query: &ObjectQuery,
        filter: &ObjectFilter,
    ) -> EngineResult<Page<ObjectRecord>> {
        let window: PageWindow = filter.window();
        let items = self.store.find_objects(root, query, window).await?;
        // Counted separately from the page fetch; concurrent writes may make
        // the two disagree.
        let total = self.store.count_objects(root, query).await?;
        tracing::debug!(
            root,
            collection_id = %query.collection_id,
            skip = window.skip,
            limit = window.limit,
            returned = items.len(),
            total,
            "object query"
        );
        Ok(Page::new(items, filter.has_next_page(total)))
    }
}

impl std::fmt::Debug for ObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStore").finish_non_exhaustive()
    }
}
