use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use taxii_types::{ApiRootRecord, Collection, Discovery, ObjectRecord, StatusRecord};

use crate::error::{StoreError, StoreResult};
use crate::query::{ObjectQuery, PageWindow, StatusConsumption, StatusUpdate};
use crate::traits::DocumentStore;

/// Contents of one API root's namespace.
#[derive(Debug, Default)]
struct Namespace {
    collections: Vec<Collection>,
    /// Insertion order is the query order.
    objects: Vec<ObjectRecord>,
    statuses: HashMap<String, StatusRecord>,
}

/// In-memory, HashMap-based document store.
///
/// Intended for tests, embedding, and single-process deployments. Every
/// operation takes the relevant `RwLock` exactly once, which is what makes
/// `consume_status` atomic. Data is lost when the store is dropped.
pub struct InMemoryDocumentStore {
    namespaces: RwLock<HashMap<String, Namespace>>,
    discovery: RwLock<Option<Discovery>>,
    api_roots: RwLock<Vec<ApiRootRecord>>,
}

impl InMemoryDocumentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            namespaces: RwLock::new(HashMap::new()),
            discovery: RwLock::new(None),
            api_roots: RwLock::new(Vec::new()),
        }
    }

    /// Number of object rows in a namespace.
    pub fn object_count(&self, root: &str) -> usize {
        self.namespaces
            .read()
            .map(|map| map.get(root).map_or(0, |ns| ns.objects.len()))
            .unwrap_or(0)
    }

    /// Number of status records in a namespace.
    pub fn status_count(&self, root: &str) -> usize {
        self.namespaces
            .read()
            .map(|map| map.get(root).map_or(0, |ns| ns.statuses.len()))
            .unwrap_or(0)
    }

    fn read_namespaces(&self) -> StoreResult<RwLockReadGuard<'_, HashMap<String, Namespace>>> {
        self.namespaces
            .read()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {e}")))
    }

    fn write_namespaces(&self) -> StoreResult<RwLockWriteGuard<'_, HashMap<String, Namespace>>> {
        self.namespaces
            .write()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {e}")))
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

fn namespace_mut<'a>(
    map: &'a mut HashMap<String, Namespace>,
    root: &str,
) -> StoreResult<&'a mut Namespace> {
    map.get_mut(root)
        .ok_or_else(|| StoreError::UnknownNamespace(root.to_string()))
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn create_namespace(&self, root: &str) -> StoreResult<()> {
        let mut map = self.write_namespaces()?;
        map.entry(root.to_string()).or_default();
        Ok(())
    }

    async fn namespace_exists(&self, root: &str) -> StoreResult<bool> {
        Ok(self.read_namespaces()?.contains_key(root))
    }

    async fn put_discovery(&self, discovery: &Discovery) -> StoreResult<()> {
        let mut slot = self
            .discovery
            .write()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {e}")))?;
        *slot = Some(discovery.clone());
        Ok(())
    }

    async fn discovery(&self) -> StoreResult<Option<Discovery>> {
        let slot = self
            .discovery
            .read()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {e}")))?;
        Ok(slot.clone())
    }

    async fn put_api_root(&self, record: &ApiRootRecord) -> StoreResult<()> {
        let mut roots = self
            .api_roots
            .write()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {e}")))?;
        match roots.iter_mut().find(|r| r.name == record.name) {
            Some(existing) => *existing = record.clone(),
            None => roots.push(record.clone()),
        }
        Ok(())
    }

    async fn api_root_by_name(&self, name: &str) -> StoreResult<Option<ApiRootRecord>> {
        let roots = self
            .api_roots
            .read()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {e}")))?;
        Ok(roots.iter().find(|r| r.name == name).cloned())
    }

    async fn api_roots_by_url(&self, urls: &[String]) -> StoreResult<Vec<ApiRootRecord>> {
        let roots = self
            .api_roots
            .read()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {e}")))?;
        Ok(urls
            .iter()
            .filter_map(|url| roots.iter().find(|r| &r.url == url).cloned())
            .collect())
    }

    async fn put_collection(&self, root: &str, collection: &Collection) -> StoreResult<()> {
        let mut map = self.write_namespaces()?;
        let ns = namespace_mut(&mut map, root)?;
        match ns.collections.iter_mut().find(|c| c.id == collection.id) {
            Some(existing) => *existing = collection.clone(),
            None => ns.collections.push(collection.clone()),
        }
        Ok(())
    }

    async fn collections(&self, root: &str) -> StoreResult<Vec<Collection>> {
        let map = self.read_namespaces()?;
        Ok(map.get(root).map(|ns| ns.collections.clone()).unwrap_or_default())
    }

    async fn collection(&self, root: &str, id: &str) -> StoreResult<Option<Collection>> {
        let map = self.read_namespaces()?;
        Ok(map
            .get(root)
            .and_then(|ns| ns.collections.iter().find(|c| c.id == id).cloned()))
    }

    async fn insert_object(&self, root: &str, record: &ObjectRecord) -> StoreResult<()> {
        let mut map = self.write_namespaces()?;
        namespace_mut(&mut map, root)?.objects.push(record.clone());
        Ok(())
    }

    async fn find_objects(
        &self,
        root: &str,
        query: &ObjectQuery,
        window: PageWindow,
    ) -> StoreResult<Vec<ObjectRecord>> {
        let map = self.read_namespaces()?;
        let Some(ns) = map.get(root) else {
            return Ok(Vec::new());
        };
        Ok(ns
            .objects
            .iter()
            .filter(|r| query.matches(r))
            .skip(window.skip)
            .take(window.limit)
            .cloned()
            .collect())
    }

    async fn count_objects(&self, root: &str, query: &ObjectQuery) -> StoreResult<u64> {
        let map = self.read_namespaces()?;
        Ok(map.get(root).map_or(0, |ns| {
            ns.objects.iter().filter(|r| query.matches(r)).count() as u64
        }))
    }

    async fn delete_object(&self, root: &str, query: &ObjectQuery) -> StoreResult<u64> {
        let mut map = self.write_namespaces()?;
        let Some(ns) = map.get_mut(root) else {
            return Ok(0);
        };
        let Some(index) = ns.objects.iter().position(|r| query.matches(r)) else {
            tracing::debug!(root, collection_id = %query.collection_id, "no object matched delete");
            return Ok(0);
        };
        let removed = ns.objects.remove(index);
        tracing::debug!(
            root,
            collection_id = %removed.collection_id,
            object_id = removed.object_id().unwrap_or_default(),
            version = removed.version(),
            "object row deleted"
        );
        Ok(1)
    }

    async fn insert_status(&self, root: &str, record: &StatusRecord) -> StoreResult<()> {
        let mut map = self.write_namespaces()?;
        namespace_mut(&mut map, root)?
            .statuses
            .insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn update_status(&self, root: &str, id: &str, update: &StatusUpdate) -> StoreResult<bool> {
        let mut map = self.write_namespaces()?;
        let Some(record) = map.get_mut(root).and_then(|ns| ns.statuses.get_mut(id)) else {
            return Ok(false);
        };
        update.apply(record);
        Ok(true)
    }

    async fn find_status(&self, root: &str, id: &str) -> StoreResult<Option<StatusRecord>> {
        let map = self.read_namespaces()?;
        Ok(map.get(root).and_then(|ns| ns.statuses.get(id)).cloned())
    }

    async fn consume_status(
        &self,
        root: &str,
        id: &str,
        max_reads: u32,
    ) -> StoreResult<StatusConsumption> {
        // One write guard for the whole read-compare-modify.
        let mut map = self.write_namespaces()?;
        let Some(ns) = map.get_mut(root) else {
            tracing::debug!(root, "status read against unprovisioned namespace");
            return Ok(StatusConsumption::Missing);
        };
        let Some(record) = ns.statuses.get_mut(id) else {
            return Ok(StatusConsumption::Missing);
        };
        if record.queryable >= max_reads {
            ns.statuses.remove(id);
            tracing::debug!(root, status_id = id, max_reads, "status record removed on over-read");
            return Ok(StatusConsumption::Expired);
        }
        let snapshot = record.clone();
        record.queryable += 1;
        tracing::debug!(root, status_id = id, reads = record.queryable, "status record read");
        Ok(StatusConsumption::Read(snapshot))
    }
}

impl std::fmt::Debug for InMemoryDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let namespaces = self.namespaces.read().map(|m| m.len()).unwrap_or(0);
        f.debug_struct("InMemoryDocumentStore")
            .field("namespace_count", &namespaces)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use taxii_types::{ApiRootInfo, BundleEntry, Manifest, StatusKind};

    const ROOT: &str = "example1";

    fn make_record(collection: &str, id: &str, version: &str) -> ObjectRecord {
        let mut entry = BundleEntry::new("bundle", id);
        entry.spec_version = Some("2.1".into());
        ObjectRecord {
            entry,
            collection_id: collection.into(),
            manifest: Manifest {
                media_type: Some("application/stix+json;version2.1".into()),
                version: version.into(),
                id: format!("bundle--m-{id}-{version}"),
                date_added: "2023-05-10T09:16:08.756725+00:00".into(),
            },
        }
    }

    fn make_root(name: &str) -> ApiRootRecord {
        ApiRootRecord {
            url: format!("https://localhost:6100/{name}/"),
            name: name.into(),
            info: ApiRootInfo {
                title: name.into(),
                description: None,
                versions: vec!["application/taxii+json;version=2.1".into()],
                max_content_length: 1024,
            },
        }
    }

    async fn provisioned() -> InMemoryDocumentStore {
        let store = InMemoryDocumentStore::new();
        store.create_namespace(ROOT).await.unwrap();
        store
    }

    // -----------------------------------------------------------------------
    // Namespaces and discovery
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn namespace_lifecycle() {
        let store = InMemoryDocumentStore::new();
        assert!(!store.namespace_exists(ROOT).await.unwrap());
        store.create_namespace(ROOT).await.unwrap();
        store.create_namespace(ROOT).await.unwrap();
        assert!(store.namespace_exists(ROOT).await.unwrap());
    }

    #[tokio::test]
    async fn writes_require_namespace() {
        let store = InMemoryDocumentStore::new();
        let err = store
            .insert_object("nowhere", &make_record("c", "x", "v1"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownNamespace(_)));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn reads_on_unknown_namespace_are_empty() {
        let store = InMemoryDocumentStore::new();
        let q = ObjectQuery::collection("c");
        assert!(store.find_objects("nowhere", &q, PageWindow::all()).await.unwrap().is_empty());
        assert_eq!(store.count_objects("nowhere", &q).await.unwrap(), 0);
        assert_eq!(store.delete_object("nowhere", &q).await.unwrap(), 0);
        assert!(store.collections("nowhere").await.unwrap().is_empty());
        assert_eq!(
            store.consume_status("nowhere", "id", 2).await.unwrap(),
            StatusConsumption::Missing
        );
    }

    #[tokio::test]
    async fn api_root_join_preserves_url_order_and_skips_unknown() {
        let store = InMemoryDocumentStore::new();
        store.put_api_root(&make_root("a")).await.unwrap();
        store.put_api_root(&make_root("b")).await.unwrap();

        let urls = vec![
            "https://localhost:6100/b/".to_string(),
            "https://localhost:6100/missing/".to_string(),
            "https://localhost:6100/a/".to_string(),
        ];
        let found = store.api_roots_by_url(&urls).await.unwrap();
        let names: Vec<_> = found.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn put_api_root_replaces_by_name() {
        let store = InMemoryDocumentStore::new();
        store.put_api_root(&make_root("a")).await.unwrap();
        let mut updated = make_root("a");
        updated.info.title = "renamed".into();
        store.put_api_root(&updated).await.unwrap();

        let found = store.api_root_by_name("a").await.unwrap().unwrap();
        assert_eq!(found.info.title, "renamed");
        assert!(store.api_root_by_name("b").await.unwrap().is_none());
    }

    // -----------------------------------------------------------------------
    // Collections and objects
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn collections_replace_by_id() {
        let store = provisioned().await;
        store.put_collection(ROOT, &Collection::new("c1", "one")).await.unwrap();
        store.put_collection(ROOT, &Collection::new("c1", "uno")).await.unwrap();
        store.put_collection(ROOT, &Collection::new("c2", "two")).await.unwrap();

        let all = store.collections(ROOT).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(store.collection(ROOT, "c1").await.unwrap().unwrap().title, "uno");
        assert!(store.collection(ROOT, "c3").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_respects_insertion_order_and_window() {
        let store = provisioned().await;
        for i in 0..5 {
            store
                .insert_object(ROOT, &make_record("c", &format!("obj-{i}"), "v1"))
                .await
                .unwrap();
        }
        store.insert_object(ROOT, &make_record("other", "obj-x", "v1")).await.unwrap();

        let q = ObjectQuery::collection("c");
        assert_eq!(store.count_objects(ROOT, &q).await.unwrap(), 5);

        let page = store.find_objects(ROOT, &q, PageWindow::new(2, 2)).await.unwrap();
        let ids: Vec<_> = page.iter().filter_map(|r| r.object_id()).collect();
        assert_eq!(ids, vec!["obj-2", "obj-3"]);

        let tail = store.find_objects(ROOT, &q, PageWindow::new(4, 2)).await.unwrap();
        assert_eq!(tail.len(), 1);
    }

    #[tokio::test]
    async fn delete_removes_one_match_at_a_time() {
        let store = provisioned().await;
        store.insert_object(ROOT, &make_record("c", "dup", "v1")).await.unwrap();
        store.insert_object(ROOT, &make_record("c", "dup", "v2")).await.unwrap();

        let q = ObjectQuery::collection("c").with_object_id("dup");
        assert_eq!(store.delete_object(ROOT, &q).await.unwrap(), 1);
        assert_eq!(store.object_count(ROOT), 1);
        let left = store.find_objects(ROOT, &q, PageWindow::all()).await.unwrap();
        assert_eq!(left[0].version(), "v2");

        assert_eq!(store.delete_object(ROOT, &q).await.unwrap(), 1);
        assert_eq!(store.delete_object(ROOT, &q).await.unwrap(), 0);
    }

    // -----------------------------------------------------------------------
    // Status
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn status_update_and_find() {
        let store = provisioned().await;
        let status = StatusRecord::pending("t0");
        store.insert_status(ROOT, &status).await.unwrap();

        let update = StatusUpdate {
            status: StatusKind::Success,
            total_count: 3,
            success_count: 3,
            failure_count: 0,
            pending_count: 0,
            timestamp: "t1".into(),
        };
        assert!(store.update_status(ROOT, &status.id, &update).await.unwrap());
        assert!(!store.update_status(ROOT, "missing", &update).await.unwrap());

        let found = store.find_status(ROOT, &status.id).await.unwrap().unwrap();
        assert_eq!(found.status, StatusKind::Success);
        assert_eq!(found.total_count, 3);
    }

    #[tokio::test]
    async fn consume_returns_pre_increment_then_expires() {
        let store = provisioned().await;
        let status = StatusRecord::pending("t0");
        store.insert_status(ROOT, &status).await.unwrap();

        let first = store.consume_status(ROOT, &status.id, 2).await.unwrap();
        assert!(matches!(first, StatusConsumption::Read(ref r) if r.queryable == 0));
        let stored = store.find_status(ROOT, &status.id).await.unwrap().unwrap();
        assert_eq!(stored.queryable, 1);

        let second = store.consume_status(ROOT, &status.id, 2).await.unwrap();
        assert!(matches!(second, StatusConsumption::Read(ref r) if r.queryable == 1));

        assert_eq!(
            store.consume_status(ROOT, &status.id, 2).await.unwrap(),
            StatusConsumption::Expired
        );
        assert_eq!(store.status_count(ROOT), 0);
        assert_eq!(
            store.consume_status(ROOT, &status.id, 2).await.unwrap(),
            StatusConsumption::Missing
        );
    }

    #[tokio::test]
    async fn concurrent_consumers_never_exceed_the_limit() {
        let store = Arc::new(provisioned().await);
        let status = StatusRecord::pending("t0");
        store.insert_status(ROOT, &status).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = Arc::clone(&store);
            let id = status.id.clone();
            handles.push(tokio::spawn(async move {
                store.consume_status(ROOT, &id, 2).await.unwrap()
            }));
        }

        let mut reads = 0;
        let mut expired = 0;
        for handle in handles {
            match handle.await.unwrap() {
                StatusConsumption::Read(_) => reads += 1,
                StatusConsumption::Expired => expired += 1,
                StatusConsumption::Missing => {}
            }
        }
        assert_eq!(reads, 2);
        assert_eq!(expired, 1);
    }
}
