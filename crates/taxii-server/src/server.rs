use std::sync::Arc;

use taxii_engine::TaxiiEngine;
use taxii_store::{DocumentStore, InMemoryDocumentStore};
use tokio::net::TcpListener;

use crate::auth::SharedCredentialAuth;
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::provision::provision;
use crate::router::build_router;
use crate::state::AppState;

/// TAXII 2.1 server over a document store.
pub struct TaxiiServer {
    config: ServerConfig,
    store: Arc<dyn DocumentStore>,
}

impl TaxiiServer {
    /// A server backed by a fresh in-memory store.
    pub fn new(config: ServerConfig) -> Self {
        Self::with_store(config, Arc::new(InMemoryDocumentStore::new()))
    }

    pub fn with_store(config: ServerConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Load the configured discovery, roots, and collections into the store.
    pub async fn provision(&self) -> ServerResult<()> {
        provision(self.store.as_ref(), &self.config).await
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        let engine = TaxiiEngine::new(Arc::clone(&self.store), self.config.server_limit);
        let auth = Arc::new(SharedCredentialAuth::from_config(&self.config.credentials));
        build_router(AppState::new(engine, auth), self.config.max_body_size())
    }

    /// Validate, provision, and serve until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        self.config.validate()?;
        self.provision().await?;

        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            bind_addr = %self.config.bind_addr,
            api_roots = self.config.api_roots.len(),
            "TAXII server listening"
        );
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

impl std::fmt::Debug for TaxiiServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaxiiServer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_construction() {
        let server = TaxiiServer::new(ServerConfig::default());
        assert_eq!(server.config().bind_addr, "127.0.0.1:6100".parse().unwrap());
    }

    #[tokio::test]
    async fn router_builds_after_provisioning() {
        let server = TaxiiServer::new(ServerConfig::default());
        server.provision().await.unwrap();
        let _router = server.router();
    }
}
