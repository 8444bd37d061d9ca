//! Typed query and update shapes the engine hands to a [`DocumentStore`].
//!
//! [`DocumentStore`]: crate::DocumentStore

use taxii_types::{ObjectRecord, StatusKind, StatusRecord};

/// Equality predicate over stored objects.
///
/// `collection_id` is always constrained; the remaining fields only
/// constrain the match when present, which yields every combination of
/// spec_version and version filtering from one shape.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjectQuery {
    pub collection_id: String,
    pub object_id: Option<String>,
    pub spec_version: Option<String>,
    /// Compared against the manifest version.
    pub version: Option<String>,
}

impl ObjectQuery {
    /// Match every object in a collection.
    pub fn collection(collection_id: impl Into<String>) -> Self {
        Self {
            collection_id: collection_id.into(),
            ..Self::default()
        }
    }

    pub fn with_object_id(mut self, object_id: impl Into<String>) -> Self {
        self.object_id = Some(object_id.into());
        self
    }

    pub fn with_spec_version(mut self, spec_version: Option<String>) -> Self {
        self.spec_version = spec_version;
        self
    }

    pub fn with_version(mut self, version: Option<String>) -> Self {
        self.version = version;
        self
    }

    /// Evaluate the predicate against one record.
    pub fn matches(&self, record: &ObjectRecord) -> bool {
        if record.collection_id != self.collection_id {
            return false;
        }
        if let Some(id) = &self.object_id {
            if record.object_id() != Some(id.as_str()) {
                return false;
            }
        }
        if let Some(spec_version) = &self.spec_version {
            if record.spec_version() != Some(spec_version.as_str()) {
                return false;
            }
        }
        if let Some(version) = &self.version {
            if record.version() != version {
                return false;
            }
        }
        true
    }
}

/// Skip/limit window over a result set in insertion order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageWindow {
    pub skip: usize,
    pub limit: usize,
}

impl PageWindow {
    pub fn new(skip: usize, limit: usize) -> Self {
        Self { skip, limit }
    }

    /// A window covering every row.
    pub fn all() -> Self {
        Self {
            skip: 0,
            limit: usize::MAX,
        }
    }
}

/// Field-level `$set` applied to a status record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusUpdate {
    pub status: StatusKind,
    pub total_count: u64,
    pub success_count: u64,
    pub failure_count: u64,
    pub pending_count: u64,
    pub timestamp: String,
}

impl StatusUpdate {
    pub fn apply(&self, record: &mut StatusRecord) {
        record.status = self.status;
        record.total_count = self.total_count;
        record.success_count = self.success_count;
        record.failure_count = self.failure_count;
        record.pending_count = self.pending_count;
        record.timestamp = Some(self.timestamp.clone());
    }
}

/// Result of the atomic increment-if-below-threshold-else-delete primitive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatusConsumption {
    /// The record as it stood before its read counter was incremented.
    Read(StatusRecord),
    /// The record had reached its read limit and has now been deleted.
    Expired,
    /// No record with that id exists.
    Missing,
}

#[cfg(test)]
mod tests {
    use super::*;
    use taxii_types::{BundleEntry, Manifest};

    fn record(collection: &str, id: &str, spec_version: Option<&str>, version: &str) -> ObjectRecord {
        let mut entry = BundleEntry::new("bundle", id);
        entry.spec_version = spec_version.map(str::to_string);
        ObjectRecord {
            entry,
            collection_id: collection.into(),
            manifest: Manifest {
                media_type: None,
                version: version.into(),
                id: "bundle--m".into(),
                date_added: "d".into(),
            },
        }
    }

    #[test]
    fn collection_is_always_constrained() {
        let q = ObjectQuery::collection("a");
        assert!(q.matches(&record("a", "x", Some("2.1"), "v1")));
        assert!(!q.matches(&record("b", "x", Some("2.1"), "v1")));
    }

    #[test]
    fn optional_constraints_combine() {
        let r = record("a", "x", Some("2.1"), "v1");
        let base = ObjectQuery::collection("a");

        assert!(base.clone().with_spec_version(Some("2.1".into())).matches(&r));
        assert!(!base.clone().with_spec_version(Some("2.0".into())).matches(&r));
        assert!(base.clone().with_version(Some("v1".into())).matches(&r));
        assert!(!base.clone().with_version(Some("v2".into())).matches(&r));
        assert!(base
            .clone()
            .with_spec_version(Some("2.1".into()))
            .with_version(Some("v1".into()))
            .matches(&r));
        assert!(!base.clone().with_object_id("y").matches(&r));
        assert!(base.with_object_id("x").matches(&r));
    }

    #[test]
    fn update_sets_fields() {
        let mut status = StatusRecord::pending("t0");
        StatusUpdate {
            status: StatusKind::Success,
            total_count: 2,
            success_count: 2,
            failure_count: 0,
            pending_count: 0,
            timestamp: "t1".into(),
        }
        .apply(&mut status);
        assert_eq!(status.status, StatusKind::Success);
        assert_eq!(status.success_count, 2);
        assert_eq!(status.timestamp.as_deref(), Some("t1"));
        assert_eq!(status.request_timestamp, "t0");
    }
}
