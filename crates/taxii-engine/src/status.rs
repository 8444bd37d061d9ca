//! Status ledger: creation, completion, and bounded consumption of ingest
//! status records.
//!
//! A record moves `pending -> success` and is then readable at most
//! [`MAX_STATUS_READS`] times in total. The read that finds the counter at
//! the limit deletes the record; every later read sees the deletion marker.

use std::sync::Arc;

use serde::{Serialize, Serializer};
use taxii_store::{DocumentStore, StatusConsumption, StatusUpdate};
use taxii_types::{now_timestamp, StatusKind, StatusRecord};

use crate::error::EngineResult;

/// Number of successful reads a status record allows before deletion.
pub const MAX_STATUS_READS: u32 = 2;

/// Returned in place of a record that is unknown or has been consumed.
pub const DELETED_MARKER: &str = "Deleted";

/// Result of reading a status record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatusRead {
    /// The record as it stood before this read was counted.
    Record(StatusRecord),
    /// The record does not exist (never did, or was just consumed).
    Deleted,
}

impl StatusRead {
    pub fn record(&self) -> Option<&StatusRecord> {
        match self {
            Self::Record(record) => Some(record),
            Self::Deleted => None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted)
    }
}

impl Serialize for StatusRead {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Record(record) => record.serialize(serializer),
            Self::Deleted => serializer.serialize_str(DELETED_MARKER),
        }
    }
}

/// Creates, completes, and consumes status records in an API root's
/// namespace.
#[derive(Clone)]
pub struct StatusLedger {
    store: Arc<dyn DocumentStore>,
}

impl StatusLedger {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Persist a fresh pending record stamped with the current time.
    pub async fn create(&self, root: &str) -> EngineResult<StatusRecord> {
        let record = StatusRecord::pending(now_timestamp());
        self.store.insert_status(root, &record).await?;
        tracing::debug!(root, status_id = %record.id, "status record created");
        Ok(record)
    }

    /// Mark a record successful with `count` objects ingested.
    ///
    /// Returns `false` if the record no longer exists.
    pub async fn complete(&self, root: &str, id: &str, count: u64) -> EngineResult<bool> {
        let update = StatusUpdate {
            status: StatusKind::Success,
            total_count: count,
            success_count: count,
            failure_count: 0,
            pending_count: 0,
            timestamp: now_timestamp(),
        };
        Ok(self.store.update_status(root, id, &update).await?)
    }

    /// Read a record, consuming one of its allowed reads.
    pub async fn read(&self, root: &str, id: &str) -> EngineResult<StatusRead> {
        match self.store.consume_status(root, id, MAX_STATUS_READS).await? {
            StatusConsumption::Read(record) => Ok(StatusRead::Record(record)),
            StatusConsumption::Expired => {
                tracing::info!(root, status_id = id, "status record exhausted and deleted");
                Ok(StatusRead::Deleted)
            }
            StatusConsumption::Missing => {
                tracing::debug!(root, status_id = id, "status record not found");
                Ok(StatusRead::Deleted)
            }
        }
    }
}

impl std::fmt::Debug for StatusLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusLedger").finish_non_exhaustive()
    }
}
