//! STIX payloads: bundles as posted by clients and the rows persisted for
//! each bundle entry.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::TypeError;
use crate::manifest::Manifest;

/// The only STIX version this server speaks.
pub const DEFAULT_SPEC_VERSION: &str = "2.1";

/// A STIX domain object nested inside a bundle entry.
///
/// Only the fields the server reads are typed; the remainder of the document
/// round-trips through `extra` unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StixObject {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StixObject {
    /// The declared `spec_version`, treating an empty string as absent.
    pub fn spec_version(&self) -> Option<&str> {
        non_empty(self.spec_version.as_deref())
    }

    /// The `created` timestamp, treating an empty string as absent.
    pub fn created(&self) -> Option<&str> {
        non_empty(self.created.as_deref())
    }
}

/// One element of a posted bundle's `objects` array.
///
/// Each entry wraps its own inner `objects` array of STIX domain objects and
/// is persisted as a single row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BundleEntry {
    #[serde(rename = "type")]
    pub entry_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec_version: Option<String>,
    #[serde(default)]
    pub objects: Vec<StixObject>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BundleEntry {
    /// Create an entry with no inner objects.
    pub fn new(entry_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            entry_type: entry_type.into(),
            id: Some(id.into()),
            spec_version: None,
            objects: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Builder-style helper that appends an inner object.
    pub fn with_object(mut self, object: StixObject) -> Self {
        self.objects.push(object);
        self
    }

    /// The first wrapped domain object, which manifest generation reads from.
    pub fn first_object(&self) -> Option<&StixObject> {
        self.objects.first()
    }

    /// The entry's own `spec_version`, treating an empty string as absent.
    pub fn spec_version(&self) -> Option<&str> {
        non_empty(self.spec_version.as_deref())
    }
}

/// The ingest payload: `{"objects": [entry, ...]}` plus any other
/// top-level fields the client sent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    #[serde(default)]
    pub objects: Vec<BundleEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Bundle {
    /// Build a bundle from its entries.
    pub fn new(objects: Vec<BundleEntry>) -> Self {
        Self {
            objects,
            extra: Map::new(),
        }
    }

    /// Interpret an untyped JSON document as a bundle.
    ///
    /// Fails if the document is not an object, if `objects` is not an array,
    /// or if any entry is not an object carrying a string `type`.
    pub fn from_value(value: Value) -> Result<Self, TypeError> {
        serde_json::from_value(value).map_err(|e| TypeError::MalformedBundle(e.to_string()))
    }

    /// Parse a bundle from raw request bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TypeError> {
        serde_json::from_slice(bytes).map_err(|e| TypeError::MalformedBundle(e.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }
}

/// A persisted bundle entry: the client's document plus the server-managed
/// `_collection_id` and `_manifest` fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    #[serde(flatten)]
    pub entry: BundleEntry,
    #[serde(rename = "_collection_id")]
    pub collection_id: String,
    #[serde(rename = "_manifest")]
    pub manifest: Manifest,
}

impl ObjectRecord {
    /// The object identifier used for by-id queries.
    pub fn object_id(&self) -> Option<&str> {
        self.entry.id.as_deref()
    }

    pub fn spec_version(&self) -> Option<&str> {
        self.entry.spec_version()
    }

    /// The manifest version, which doubles as the object's version key.
    pub fn version(&self) -> &str {
        &self.manifest.version
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
