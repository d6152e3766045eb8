use serde_json::Value as JsonValue;
use std::sync::Arc;
use thiserror::Error;

use shopledger_core::DocumentId;

/// A stored document paired with its store-assigned id.
///
/// The id lives outside the document body: stores assign it on insert and
/// hand it back on every query row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: DocumentId,
    pub data: JsonValue,
}

/// Single-field equality predicate (`field == value`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub field: String,
    pub value: JsonValue,
}

impl Filter {
    pub fn equals(field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Sort direction for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Result ordering on one document field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// Document store operation error.
///
/// These are **infrastructure errors** (connectivity, permissions, missing
/// documents) as opposed to domain errors (validation).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document not found: {0}")]
    NotFound(DocumentId),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),
}

/// Collection-oriented document store.
///
/// ## Design Principles
///
/// - **No storage assumptions**: works with in-memory implementations
///   (tests/dev) and hosted document databases (production)
/// - **Opaque ids**: the store mints ids on insert; callers never choose them
/// - **Single-document atomicity**: each operation touches one document and
///   either fully applies or fully fails; there is no multi-document
///   transaction surface
/// - **Last write wins**: concurrent writes against one id race at the
///   store, with no ordering or conflict detection imposed here
///
/// ## Patch Semantics
///
/// `patch()` is an application-level merge: the top-level keys of `changes`
/// replace the corresponding keys of the stored document, leaving all other
/// keys untouched. No store-native partial-update primitives are assumed.
pub trait DocumentStore: Send + Sync {
    /// Insert a new document, returning the store-assigned id.
    fn insert(&self, collection: &str, data: JsonValue) -> Result<DocumentId, StoreError>;

    /// Fetch documents, optionally filtered by one field-equality predicate
    /// and ordered on one field.
    fn query(
        &self,
        collection: &str,
        filter: Option<Filter>,
        order: Option<OrderBy>,
    ) -> Result<Vec<Document>, StoreError>;

    /// Merge `changes` into an existing document (top-level keys).
    fn patch(&self, collection: &str, id: DocumentId, changes: JsonValue)
        -> Result<(), StoreError>;

    /// Hard-delete a document.
    fn remove(&self, collection: &str, id: DocumentId) -> Result<(), StoreError>;
}

impl<S> DocumentStore for Arc<S>
where
    S: DocumentStore + ?Sized,
{
    fn insert(&self, collection: &str, data: JsonValue) -> Result<DocumentId, StoreError> {
        (**self).insert(collection, data)
    }

    fn query(
        &self,
        collection: &str,
        filter: Option<Filter>,
        order: Option<OrderBy>,
    ) -> Result<Vec<Document>, StoreError> {
        (**self).query(collection, filter, order)
    }

    fn patch(
        &self,
        collection: &str,
        id: DocumentId,
        changes: JsonValue,
    ) -> Result<(), StoreError> {
        (**self).patch(collection, id, changes)
    }

    fn remove(&self, collection: &str, id: DocumentId) -> Result<(), StoreError> {
        (**self).remove(collection, id)
    }
}
