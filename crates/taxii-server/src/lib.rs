//! HTTP server for TAXII 2.1.
//!
//! Serves discovery, API roots, collections, objects, manifests, and ingest
//! status over axum, with HTTP Basic authentication and TAXII media-type
//! negotiation in front of every route.

pub mod auth;
pub mod config;
pub mod error;
pub mod handler;
pub mod media;
pub mod provision;
pub mod router;
pub mod server;
pub mod state;

pub use auth::{AuthProvider, Credentials, Identity, SharedCredentialAuth};
pub use config::{ApiRootConfig, CredentialsConfig, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use media::{TaxiiJson, TAXII_CONTENT_TYPE};
pub use server::TaxiiServer;
pub use state::AppState;
