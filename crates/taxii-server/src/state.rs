use std::sync::Arc;

use taxii_engine::TaxiiEngine;

use crate::auth::AuthProvider;

/// Shared per-request state: the engine and the credential check.
#[derive(Clone)]
pub struct AppState {
    pub engine: TaxiiEngine,
    pub auth: Arc<dyn AuthProvider>,
}

impl AppState {
    pub fn new(engine: TaxiiEngine, auth: Arc<dyn AuthProvider>) -> Self {
        Self { engine, auth }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}
