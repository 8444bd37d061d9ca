use taxii_store::DocumentStore;

use crate::config::ServerConfig;
use crate::error::ServerResult;

/// Load discovery, API roots, and collections from configuration into the
/// store. Safe to repeat: every write replaces by key.
pub async fn provision(store: &dyn DocumentStore, config: &ServerConfig) -> ServerResult<()> {
    for root in &config.api_roots {
        store.create_namespace(&root.name).await?;
        store.put_api_root(&root.record()).await?;
        for collection in &root.collections {
            store.put_collection(&root.name, collection).await?;
        }
        tracing::info!(
            api_root = %root.name,
            collections = root.collections.len(),
            "api root provisioned"
        );
    }
    store.put_discovery(&config.discovery).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiRootConfig;
    use taxii_store::InMemoryDocumentStore;
    use taxii_types::Collection;

    fn config() -> ServerConfig {
        let mut config = ServerConfig::default();
        config.discovery.api_roots = vec!["https://localhost:6100/example1/".into()];
        config.api_roots.push(ApiRootConfig {
            name: "example1".into(),
            url: "https://localhost:6100/example1/".into(),
            title: "example one".into(),
            description: Some("first".into()),
            versions: vec!["application/taxii+json;version=2.1".into()],
            max_content_length: 9765625,
            collections: vec![Collection::new("c1", "one"), Collection::new("c2", "two")],
        });
        config
    }

    #[tokio::test]
    async fn provisions_everything() {
        let store = InMemoryDocumentStore::new();
        provision(&store, &config()).await.unwrap();

        assert!(store.namespace_exists("example1").await.unwrap());
        assert_eq!(store.collections("example1").await.unwrap().len(), 2);
        let root = store.api_root_by_name("example1").await.unwrap().unwrap();
        assert_eq!(root.info.title, "example one");
        let discovery = store.discovery().await.unwrap().unwrap();
        assert_eq!(discovery.api_roots.len(), 1);
    }

    #[tokio::test]
    async fn provisioning_twice_does_not_duplicate() {
        let store = InMemoryDocumentStore::new();
        provision(&store, &config()).await.unwrap();
        provision(&store, &config()).await.unwrap();
        assert_eq!(store.collections("example1").await.unwrap().len(), 2);
    }
}
