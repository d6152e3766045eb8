//! Accounting-adjustment repository: validation + CRUD over the document
//! store, plus ordered/filtered reads for reporting callers.

use chrono::Utc;
use serde_json::Value as JsonValue;
use thiserror::Error;

use shopledger_core::DomainError;
use shopledger_finance::{
    AccountingAdjustment, AdjustmentDraft, AdjustmentId, AdjustmentRecord, AdjustmentType,
    AdjustmentUpdate,
};

use crate::document_store::{Document, DocumentStore, Filter, OrderBy, StoreError};

/// Collection holding adjustment documents.
pub const ADJUSTMENTS_COLLECTION: &str = "accounting_adjustments";

/// Caller-facing repository error.
///
/// `Validation` is deterministic: retrying without correcting the input
/// cannot succeed. `Store` covers infrastructure failures during writes; the
/// caller decides whether to retry. Read failures never surface through the
/// permissive getters (see [`AdjustmentRepository::get_all`]).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{0}")]
    Validation(String),

    #[error("store operation failed: {0}")]
    Store(#[from] StoreError),

    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl From<DomainError> for RepositoryError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => RepositoryError::Validation(msg),
            DomainError::InvalidId(msg) => RepositoryError::Validation(msg),
        }
    }
}

/// Repository owning the `AccountingAdjustment` lifecycle.
///
/// Composes any [`DocumentStore`]; in-memory for tests/dev, a hosted
/// document database in production. Every operation is one independent store
/// call with no local cache and no retry layer; concurrent writes against
/// the same id resolve last-write-wins at the store.
#[derive(Debug)]
pub struct AdjustmentRepository<S> {
    store: S,
}

impl<S> AdjustmentRepository<S>
where
    S: DocumentStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validate and persist a new adjustment.
    ///
    /// Validation is first-failure-wins in the order type, amount, order id,
    /// reason, status; defaults (`adminNotes` empty, `status` approved) and
    /// both timestamps are applied before the insert.
    pub fn create(&self, draft: AdjustmentDraft) -> Result<AdjustmentId, RepositoryError> {
        let record = draft.into_record(Utc::now())?;
        let data = serde_json::to_value(&record)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        let id = AdjustmentId::new(self.store.insert(ADJUSTMENTS_COLLECTION, data)?);
        tracing::info!(%id, kind = %record.kind, order_id = %record.order_id, "adjustment created");
        Ok(id)
    }

    /// Apply the mutable fields of `update` to an existing adjustment.
    ///
    /// Only `reason`, `adminNotes` and `status` can change; blank-after-trim
    /// strings count as "no change". `updatedAt` always advances, even for
    /// an otherwise-empty update.
    pub fn update(&self, id: AdjustmentId, update: AdjustmentUpdate) -> Result<(), RepositoryError> {
        let mut changes = serde_json::Map::new();

        if let Some(reason) = update.effective_reason() {
            changes.insert("reason".to_string(), JsonValue::from(reason));
        }
        if let Some(notes) = update.effective_admin_notes() {
            changes.insert("adminNotes".to_string(), JsonValue::from(notes));
        }
        if let Some(status) = update.status {
            changes.insert("status".to_string(), JsonValue::from(status.as_str()));
        }

        let now = serde_json::to_value(Utc::now())
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        changes.insert("updatedAt".to_string(), now);

        self.store
            .patch(ADJUSTMENTS_COLLECTION, id.0, JsonValue::Object(changes))?;
        tracing::info!(%id, "adjustment updated");
        Ok(())
    }

    /// Hard-delete an adjustment. Obtaining confirmation beforehand is the
    /// caller's responsibility; nothing here asks twice.
    pub fn delete(&self, id: AdjustmentId) -> Result<(), RepositoryError> {
        self.store.remove(ADJUSTMENTS_COLLECTION, id.0)?;
        tracing::info!(%id, "adjustment deleted");
        Ok(())
    }

    /// All adjustments, newest first.
    ///
    /// Permissive read: a store failure is logged and yields an empty list,
    /// so callers cannot distinguish "no data" from "read failed". Use
    /// [`Self::try_get_all`] when that distinction matters.
    pub fn get_all(&self) -> Vec<AccountingAdjustment> {
        self.permissive(self.try_get_all(), "fetching adjustments")
    }

    /// Adjustments for one order, newest first (permissive read).
    pub fn get_by_order(&self, order_id: &str) -> Vec<AccountingAdjustment> {
        self.permissive(
            self.try_get_by_order(order_id),
            "fetching adjustments by order",
        )
    }

    /// Adjustments of one type, newest first (permissive read).
    pub fn get_by_kind(&self, kind: AdjustmentType) -> Vec<AccountingAdjustment> {
        self.permissive(self.try_get_by_kind(kind), "fetching adjustments by type")
    }

    /// All adjustments, newest first, surfacing read failures.
    pub fn try_get_all(&self) -> Result<Vec<AccountingAdjustment>, RepositoryError> {
        self.fetch(None)
    }

    /// Adjustments for one order, newest first, surfacing read failures.
    pub fn try_get_by_order(
        &self,
        order_id: &str,
    ) -> Result<Vec<AccountingAdjustment>, RepositoryError> {
        self.fetch(Some(Filter::equals("orderId", order_id)))
    }

    /// Adjustments of one type, newest first, surfacing read failures.
    pub fn try_get_by_kind(
        &self,
        kind: AdjustmentType,
    ) -> Result<Vec<AccountingAdjustment>, RepositoryError> {
        self.fetch(Some(Filter::equals("type", kind.as_str())))
    }

    fn fetch(&self, filter: Option<Filter>) -> Result<Vec<AccountingAdjustment>, RepositoryError> {
        let documents = self.store.query(
            ADJUSTMENTS_COLLECTION,
            filter,
            Some(OrderBy::desc("createdAt")),
        )?;

        Ok(documents.into_iter().filter_map(hydrate).collect())
    }

    fn permissive(
        &self,
        result: Result<Vec<AccountingAdjustment>, RepositoryError>,
        context: &str,
    ) -> Vec<AccountingAdjustment> {
        match result {
            Ok(adjustments) => adjustments,
            Err(error) => {
                tracing::warn!(%error, "{context} failed; returning empty result");
                Vec::new()
            }
        }
    }
}

/// Deserialize one query row. Malformed documents are logged and skipped so
/// a single bad record cannot take down a whole listing.
fn hydrate(document: Document) -> Option<AccountingAdjustment> {
    match serde_json::from_value::<AdjustmentRecord>(document.data) {
        Ok(record) => Some(AccountingAdjustment::from_record(
            AdjustmentId::new(document.id),
            record,
        )),
        Err(error) => {
            tracing::warn!(id = %document.id, %error, "skipping malformed adjustment document");
            None
        }
    }
}
