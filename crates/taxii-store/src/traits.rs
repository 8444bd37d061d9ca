use async_trait::async_trait;
use taxii_types::{ApiRootRecord, Collection, Discovery, ObjectRecord, StatusRecord};

use crate::error::StoreResult;
use crate::query::{ObjectQuery, PageWindow, StatusConsumption, StatusUpdate};

/// Document-oriented storage engine backing the TAXII core.
///
/// The store is partitioned into one namespace per API root, each holding
/// `collections`, `objects` and `status`, plus a global discovery database
/// holding the discovery record and the registered API root records.
///
/// All implementations must satisfy these invariants:
/// - Reads against an unprovisioned namespace return empty results, never
///   an error. Writes against one fail with `UnknownNamespace`.
/// - `find_objects` and `count_objects` agree on ordering and predicate:
///   rows are returned in insertion order.
/// - `delete_object` removes at most one document per call.
/// - `consume_status` is a single atomic operation per document: two
///   concurrent calls can never both observe the same counter value.
/// - Storage failures are propagated as errors, never swallowed.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Provision an empty namespace for an API root. Idempotent.
    async fn create_namespace(&self, root: &str) -> StoreResult<()>;

    /// Whether a namespace has been provisioned for `root`.
    async fn namespace_exists(&self, root: &str) -> StoreResult<bool>;

    /// Replace the global discovery record.
    async fn put_discovery(&self, discovery: &Discovery) -> StoreResult<()>;

    /// The global discovery record, as stored.
    async fn discovery(&self) -> StoreResult<Option<Discovery>>;

    /// Register (or replace, keyed by name) an API root record.
    async fn put_api_root(&self, record: &ApiRootRecord) -> StoreResult<()>;

    /// Look up an API root record by its namespace name.
    async fn api_root_by_name(&self, name: &str) -> StoreResult<Option<ApiRootRecord>>;

    /// Join lookup: the registered records whose URL appears in `urls`, in
    /// the order of `urls`. Unregistered URLs are skipped.
    async fn api_roots_by_url(&self, urls: &[String]) -> StoreResult<Vec<ApiRootRecord>>;

    /// Insert (or replace, keyed by id) a collection in a namespace.
    async fn put_collection(&self, root: &str, collection: &Collection) -> StoreResult<()>;

    /// All collections in a namespace.
    async fn collections(&self, root: &str) -> StoreResult<Vec<Collection>>;

    /// One collection by id.
    async fn collection(&self, root: &str, id: &str) -> StoreResult<Option<Collection>>;

    /// Append an object row.
    async fn insert_object(&self, root: &str, record: &ObjectRecord) -> StoreResult<()>;

    /// Rows matching `query`, windowed by `window`.
    async fn find_objects(
        &self,
        root: &str,
        query: &ObjectQuery,
        window: PageWindow,
    ) -> StoreResult<Vec<ObjectRecord>>;

    /// Number of rows matching `query`.
    async fn count_objects(&self, root: &str, query: &ObjectQuery) -> StoreResult<u64>;

    /// Delete the first row matching `query`. Returns 0 or 1.
    async fn delete_object(&self, root: &str, query: &ObjectQuery) -> StoreResult<u64>;

    /// Persist a new status record.
    async fn insert_status(&self, root: &str, record: &StatusRecord) -> StoreResult<()>;

    /// Apply a field-level update. Returns `false` if no record matched.
    async fn update_status(&self, root: &str, id: &str, update: &StatusUpdate) -> StoreResult<bool>;

    /// Read a status record without consuming it.
    async fn find_status(&self, root: &str, id: &str) -> StoreResult<Option<StatusRecord>>;

    /// Atomically consume one read of a status record: if its counter is
    /// below `max_reads`, increment it and return the pre-increment record;
    /// otherwise delete it.
    async fn consume_status(
        &self,
        root: &str,
        id: &str,
        max_reads: u32,
    ) -> StoreResult<StatusConsumption>;
}
