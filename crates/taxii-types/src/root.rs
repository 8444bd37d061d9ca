//! API root and discovery metadata.

use serde::{Deserialize, Serialize};

/// Public metadata for one API root, as returned by `GET /{root}/`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiRootInfo {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub versions: Vec<String>,
    pub max_content_length: u64,
}

/// The registered form of an API root: its public info plus the internal
/// `_url` and `_name` keys the registry resolves against.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiRootRecord {
    #[serde(rename = "_url")]
    pub url: String,
    #[serde(rename = "_name")]
    pub name: String,
    #[serde(flatten)]
    pub info: ApiRootInfo,
}

/// The server-wide discovery document served at `/taxii2/`.
///
/// Stored as configured; the registry replaces `api_roots` with only the
/// URLs that resolve to a registered root before returning it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discovery {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default)]
    pub api_roots: Vec<String>,
}
