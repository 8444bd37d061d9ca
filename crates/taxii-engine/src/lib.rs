//! Object and collection storage and query engine for the TAXII server.
//!
//! This is where the protocol semantics live: filter resolution and
//! pagination math, the ingest write path with manifest generation, and the
//! bounded-read status lifecycle. HTTP concerns stay in `taxii-server`; this
//! crate takes plain arguments and returns plain data.
//!
//! # Components
//!
//! - [`ObjectFilter`] -- resolves `spec_version`/`version`/`limit`/`page`
//! - [`Envelope`] / [`Page`] -- the `{more, next, objects}` response wrapper
//! - [`manifest`] -- per-object manifest generation at ingest time
//! - [`StatusLedger`] -- create, complete, and consume status records
//! - [`CollectionStore`] -- collection metadata per API root
//! - [`ObjectStore`] -- object queries, ingest, and deletion
//! - [`RootRegistry`] -- root/collection existence and discovery
//! - [`TaxiiEngine`] -- all of the above over one shared store

pub mod collections;
pub mod engine;
pub mod envelope;
pub mod error;
pub mod filter;
pub mod manifest;
pub mod objects;
pub mod registry;
pub mod status;

pub use collections::CollectionStore;
pub use engine::TaxiiEngine;
pub use envelope::{Envelope, Page};
pub use error::{EngineError, EngineResult};
pub use filter::ObjectFilter;
pub use objects::{IngestOutcome, ObjectStore};
pub use registry::RootRegistry;
pub use status::{StatusLedger, StatusRead, DELETED_MARKER, MAX_STATUS_READS};
