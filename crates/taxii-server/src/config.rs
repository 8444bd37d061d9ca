use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};
use taxii_types::{ApiRootInfo, ApiRootRecord, Collection, Discovery};

use crate::error::{ServerError, ServerResult};

/// Media type advertised in each API root's `versions` unless configured.
pub const TAXII_VERSION_2_1: &str = "application/taxii+json;version=2.1";

/// Process configuration, constructed once at startup.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Page size applied when a request omits `limit`.
    pub server_limit: usize,
    pub credentials: CredentialsConfig,
    pub discovery: Discovery,
    pub api_roots: Vec<ApiRootConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 6100)),
            server_limit: 100,
            credentials: CredentialsConfig::default(),
            discovery: Discovery {
                title: "TAXII Server".into(),
                description: None,
                contact: None,
                default: None,
                api_roots: Vec::new(),
            },
            api_roots: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Load and validate a TOML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> ServerResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&raw)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
        Ok(config)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(raw: &str) -> ServerResult<Self> {
        let config: Self = toml::from_str(raw).map_err(|e| ServerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the server relies on.
    ///
    /// Discovery URLs that match no configured root are allowed: discovery
    /// resolution drops them.
    pub fn validate(&self) -> ServerResult<()> {
        if self.server_limit == 0 {
            return Err(ServerError::Config("server_limit must be greater than 0".into()));
        }
        if self.credentials.username.is_empty() || self.credentials.password.is_empty() {
            return Err(ServerError::Config("credentials must not be empty".into()));
        }

        let mut names = HashSet::new();
        for root in &self.api_roots {
            if root.name.is_empty() || root.name.contains('/') {
                return Err(ServerError::Config(format!("invalid api root name: {:?}", root.name)));
            }
            if root.name == "taxii2" {
                return Err(ServerError::Config("api root name `taxii2` is reserved for discovery".into()));
            }
            if !names.insert(root.name.as_str()) {
                return Err(ServerError::Config(format!("duplicate api root: {}", root.name)));
            }
            let mut ids = HashSet::new();
            for collection in &root.collections {
                if !ids.insert(collection.id.as_str()) {
                    return Err(ServerError::Config(format!(
                        "duplicate collection {} in api root {}",
                        collection.id, root.name
                    )));
                }
            }
        }

        for url in &self.discovery.api_roots {
            if !self.api_roots.iter().any(|r| &r.url == url) {
                tracing::warn!(%url, "discovery lists an api root that is not configured");
            }
        }
        Ok(())
    }

    /// Largest `max_content_length` across configured roots; bounds how much
    /// of a request body the router will buffer.
    pub fn max_body_size(&self) -> usize {
        self.api_roots
            .iter()
            .map(|r| r.max_content_length)
            .max()
            .map_or(DEFAULT_MAX_CONTENT_LENGTH as usize, |n| n as usize)
    }
}

/// The single shared username/password pair.
#[derive(Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    pub username: String,
    pub password: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            username: "taxii".into(),
            password: "taxii".into(),
        }
    }
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

const DEFAULT_MAX_CONTENT_LENGTH: u64 = 100 * 1024 * 1024;

fn default_max_content_length() -> u64 {
    DEFAULT_MAX_CONTENT_LENGTH
}

fn default_versions() -> Vec<String> {
    vec![TAXII_VERSION_2_1.to_string()]
}

/// One API root and the collections provisioned in it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiRootConfig {
    /// Path segment and namespace name, e.g. `example1`.
    pub name: String,
    /// URL listed in discovery.
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_versions")]
    pub versions: Vec<String>,
    #[serde(default = "default_max_content_length")]
    pub max_content_length: u64,
    #[serde(default)]
    pub collections: Vec<Collection>,
}

impl ApiRootConfig {
    pub fn record(&self) -> ApiRootRecord {
        ApiRootRecord {
            url: self.url.clone(),
            name: self.name.clone(),
            info: ApiRootInfo {
                title: self.title.clone(),
                description: self.description.clone(),
                versions: self.versions.clone(),
                max_content_length: self.max_content_length,
            },
        }
    }
}
