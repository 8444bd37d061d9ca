use serde::{Deserialize, Serialize};

/// A named, access-controlled grouping of objects within one API root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// Unique within the owning API root, conventionally a UUID.
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub can_read: bool,
    pub can_write: bool,
    #[serde(default)]
    pub media_types: Vec<String>,
}

impl Collection {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            can_read: true,
            can_write: true,
            media_types: vec!["application/stix+json;version=2.1".into()],
        }
    }
}
