use serde::{Deserialize, Serialize};

/// Per-object metadata generated at ingest time.
///
/// Owned by exactly one [`ObjectRecord`](crate::ObjectRecord) and never
/// updated after creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// `application/stix+json;version<spec_version>`, or null when the
    /// wrapped object declared no spec version.
    pub media_type: Option<String>,
    /// The object's `created` timestamp, or the ingest time.
    pub version: String,
    /// `<type>--<uuid4>`.
    pub id: String,
    /// Ingest time.
    pub date_added: String,
}
