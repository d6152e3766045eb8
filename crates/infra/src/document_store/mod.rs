//! Collection-oriented document persistence boundary.
//!
//! This module defines an infrastructure-facing abstraction for storing and
//! querying schemaless documents without making any storage assumptions.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryDocumentStore;
pub use r#trait::{Document, DocumentStore, Filter, OrderBy, SortDirection, StoreError};
