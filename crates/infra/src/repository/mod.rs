//! Validated CRUD façades over the document store.

pub mod adjustments;

pub use adjustments::{AdjustmentRepository, RepositoryError, ADJUSTMENTS_COLLECTION};
