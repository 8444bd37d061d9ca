//! Foundation types for the TAXII 2.1 server.
//!
//! This crate provides the persistent entities and wire payloads shared by
//! every other crate. STIX content is treated as an opaque document: only the
//! handful of fields the server reads (`type`, `id`, `created`,
//! `spec_version`, `objects`) are typed, everything else is carried through
//! untouched in a flattened JSON map.
//!
//! # Key Types
//!
//! - [`Bundle`] / [`BundleEntry`] / [`StixObject`] -- ingest payloads
//! - [`ObjectRecord`] -- a persisted bundle entry with its owning collection and [`Manifest`]
//! - [`StatusRecord`] -- outcome of one ingest call, consumable a bounded number of times
//! - [`Collection`] -- access-controlled grouping of objects within an API root
//! - [`ApiRootRecord`] / [`ApiRootInfo`] / [`Discovery`] -- server and root metadata

pub mod collection;
pub mod error;
pub mod manifest;
pub mod root;
pub mod status;
pub mod stix;
pub mod timestamp;

pub use collection::Collection;
pub use error::TypeError;
pub use manifest::Manifest;
pub use root::{ApiRootInfo, ApiRootRecord, Discovery};
pub use status::{StatusKind, StatusRecord};
pub use stix::{Bundle, BundleEntry, ObjectRecord, StixObject, DEFAULT_SPEC_VERSION};
pub use timestamp::{format_timestamp, now_timestamp};
