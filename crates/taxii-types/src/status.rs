use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TypeError;

/// Lifecycle state of an ingest status record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Pending,
    Success,
    Failure,
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Success => write!(f, "success"),
            Self::Failure => write!(f, "failure"),
        }
    }
}

impl FromStr for StatusKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "success" => Ok(Self::Success),
            "failure" => Ok(Self::Failure),
            other => Err(TypeError::InvalidStatus(other.to_string())),
        }
    }
}

/// Outcome of one ingest call.
///
/// `queryable` counts successful reads; the ledger deletes the record once it
/// has been read twice.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    #[serde(rename = "_queryable")]
    pub queryable: u32,
    pub id: String,
    pub status: StatusKind,
    pub request_timestamp: String,
    pub total_count: u64,
    pub success_count: u64,
    pub failure_count: u64,
    pub pending_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl StatusRecord {
    /// A fresh pending record with a random v4 id and zero counts.
    pub fn pending(request_timestamp: impl Into<String>) -> Self {
        Self {
            queryable: 0,
            id: Uuid::new_v4().to_string(),
            status: StatusKind::Pending,
            request_timestamp: request_timestamp.into(),
            total_count: 0,
            success_count: 0,
            failure_count: 0,
            pending_count: 0,
            timestamp: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pending_record_shape() {
        let record = StatusRecord::pending("2023-05-10T09:16:08.755587+00:00");
        assert_eq!(record.status, StatusKind::Pending);
        assert_eq!(record.queryable, 0);
        assert!(Uuid::parse_str(&record.id).is_ok());

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["status"], json!("pending"));
        assert_eq!(value["_queryable"], json!(0));
        assert!(value.get("timestamp").is_none());
    }

    #[test]
    fn status_kind_parse() {
        assert_eq!("success".parse::<StatusKind>().unwrap(), StatusKind::Success);
        assert_eq!(StatusKind::Failure.to_string(), "failure");
        assert_eq!(
            "done".parse::<StatusKind>().unwrap_err(),
            TypeError::InvalidStatus("done".into())
        );
    }
}
