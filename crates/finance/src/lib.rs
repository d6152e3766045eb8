//! Accounting adjustments (refunds, returns, cancellations, corrections,
//! discounts, fees) tied to orders.
//!
//! Pure domain logic only: no IO, no HTTP, no persistence concerns.

pub mod adjustment;
pub mod summary;

pub use adjustment::{
    AccountingAdjustment, AdjustmentDraft, AdjustmentId, AdjustmentRecord, AdjustmentStatus,
    AdjustmentType, AdjustmentUpdate,
};
pub use summary::{summarize, total_for, AdjustmentSummary};
