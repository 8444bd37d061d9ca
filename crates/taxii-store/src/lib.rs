//! Document storage for the TAXII server.
//!
//! This crate defines the contract the core requires of its storage engine
//! and ships an in-memory implementation of it. A relational, document, or
//! embedded key-value engine can satisfy the same contract.
//!
//! # Layout
//!
//! - one namespace per API root, holding `collections`, `objects`, `status`
//! - a global discovery database holding the discovery record and the
//!   registered API root records
//!
//! # Storage Backends
//!
//! All backends implement the [`DocumentStore`] trait:
//!
//! - [`InMemoryDocumentStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Object rows are append-only; deletion removes one row per call.
//! 2. Queries are typed equality predicates ([`ObjectQuery`]) plus a
//!    skip/limit [`PageWindow`] over insertion order.
//! 3. Status consumption is one atomic conditional operation
//!    ([`DocumentStore::consume_status`]), never read-then-write.
//! 4. All storage errors are propagated, never silently ignored.

pub mod error;
pub mod memory;
pub mod query;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryDocumentStore;
pub use query::{ObjectQuery, PageWindow, StatusConsumption, StatusUpdate};
pub use traits::DocumentStore;
