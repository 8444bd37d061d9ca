//! Manifest generation for ingested objects.

use chrono::{DateTime, Utc};
use taxii_types::{format_timestamp, Manifest, StixObject};
use uuid::Uuid;

/// Prefix of the generated media type; the object's `spec_version` is appended as-is.
pub const STIX_MEDIA_TYPE_PREFIX: &str = "application/stix+json;version";

/// Generate the manifest for one ingested entry at the current time.
///
/// `domain` is the entry's first wrapped STIX object (absent when the entry
/// wraps none) and `object_type` the entry's own `type`.
pub fn generate(domain: Option<&StixObject>, object_type: &str) -> Manifest {
    generate_at(domain, object_type, Utc::now())
}

/// [`generate`] with an explicit ingest time.
pub fn generate_at(domain: Option<&StixObject>, object_type: &str, now: DateTime<Utc>) -> Manifest {
    let ingested = format_timestamp(now);
    Manifest {
        media_type: domain
            .and_then(StixObject::spec_version)
            .map(|v| format!("{STIX_MEDIA_TYPE_PREFIX}{v}")),
        version: domain
            .and_then(StixObject::created)
            .map_or_else(|| ingested.clone(), str::to_string),
        id: format!("{object_type}--{}", Uuid::new_v4()),
        date_added: ingested,
    }
}
