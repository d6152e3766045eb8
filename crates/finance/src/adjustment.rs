use core::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use shopledger_core::{DocumentId, DomainError, DomainResult};

/// Adjustment identifier (wraps the store-assigned document id).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdjustmentId(pub DocumentId);

impl AdjustmentId {
    pub fn new(id: DocumentId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for AdjustmentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Kind of financial correction applied against an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentType {
    Refund,
    Return,
    Cancellation,
    Correction,
    Discount,
    Fee,
}

impl AdjustmentType {
    pub const ALL: [AdjustmentType; 6] = [
        AdjustmentType::Refund,
        AdjustmentType::Return,
        AdjustmentType::Cancellation,
        AdjustmentType::Correction,
        AdjustmentType::Discount,
        AdjustmentType::Fee,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdjustmentType::Refund => "refund",
            AdjustmentType::Return => "return",
            AdjustmentType::Cancellation => "cancellation",
            AdjustmentType::Correction => "correction",
            AdjustmentType::Discount => "discount",
            AdjustmentType::Fee => "fee",
        }
    }
}

impl core::fmt::Display for AdjustmentType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdjustmentType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "refund" => Ok(AdjustmentType::Refund),
            "return" => Ok(AdjustmentType::Return),
            "cancellation" => Ok(AdjustmentType::Cancellation),
            "correction" => Ok(AdjustmentType::Correction),
            "discount" => Ok(AdjustmentType::Discount),
            "fee" => Ok(AdjustmentType::Fee),
            _ => Err(DomainError::validation("Invalid adjustment type")),
        }
    }
}

impl<'de> Deserialize<'de> for AdjustmentType {
    /// Stored documents may carry a type string this build no longer knows.
    /// Those fold into `Correction` so the record still reaches reports
    /// instead of being dropped. Creation-time input goes through the strict
    /// `FromStr` instead and is rejected.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse().unwrap_or(AdjustmentType::Correction))
    }
}

/// Review state of an adjustment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentStatus {
    Pending,
    #[default]
    Approved,
    Applied,
}

impl AdjustmentStatus {
    /// Whether records in this state contribute to financial totals.
    /// Pending adjustments are excluded until they are approved.
    pub fn counts_toward_totals(&self) -> bool {
        matches!(self, AdjustmentStatus::Approved | AdjustmentStatus::Applied)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AdjustmentStatus::Pending => "pending",
            AdjustmentStatus::Approved => "approved",
            AdjustmentStatus::Applied => "applied",
        }
    }
}

impl core::fmt::Display for AdjustmentStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdjustmentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AdjustmentStatus::Pending),
            "approved" => Ok(AdjustmentStatus::Approved),
            "applied" => Ok(AdjustmentStatus::Applied),
            _ => Err(DomainError::validation("Invalid adjustment status")),
        }
    }
}

/// Persisted document body in the `accounting_adjustments` collection.
///
/// The document id lives outside the body; reads attach it back via
/// [`AccountingAdjustment::from_record`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentRecord {
    #[serde(rename = "type")]
    pub kind: AdjustmentType,
    /// Signed amount: negative = deduction, positive = charge.
    pub amount: Decimal,
    pub order_id: String,
    pub reason: String,
    pub admin_notes: String,
    pub status: AdjustmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Read-side adjustment entity: a stored record plus its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountingAdjustment {
    pub id: AdjustmentId,
    #[serde(rename = "type")]
    pub kind: AdjustmentType,
    pub amount: Decimal,
    pub order_id: String,
    pub reason: String,
    pub admin_notes: String,
    pub status: AdjustmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AccountingAdjustment {
    pub fn from_record(id: AdjustmentId, record: AdjustmentRecord) -> Self {
        Self {
            id,
            kind: record.kind,
            amount: record.amount,
            order_id: record.order_id,
            reason: record.reason,
            admin_notes: record.admin_notes,
            status: record.status,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Creation input as delivered by the admin UI boundary (loosely typed;
/// nothing is trusted until [`AdjustmentDraft::into_record`] runs).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentDraft {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub order_id: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub admin_notes: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl AdjustmentDraft {
    /// Validate the draft and produce the record to persist.
    ///
    /// Checks run in a fixed order and the first failure wins:
    /// type, amount, order id, reason, then status. Defaults are applied
    /// afterwards (`adminNotes` = empty, `status` = approved) and both
    /// timestamps are stamped with `now`.
    pub fn into_record(self, now: DateTime<Utc>) -> DomainResult<AdjustmentRecord> {
        let kind: AdjustmentType = self.kind.parse()?;

        let amount = self
            .amount
            .ok_or_else(|| DomainError::validation("Amount must be a number"))?;

        if self.order_id.trim().is_empty() {
            return Err(DomainError::validation("Order ID is required"));
        }

        if self.reason.trim().is_empty() {
            return Err(DomainError::validation("Reason is required"));
        }

        let status = match self.status.as_deref() {
            Some(s) => s.parse()?,
            None => AdjustmentStatus::default(),
        };

        Ok(AdjustmentRecord {
            kind,
            amount,
            order_id: self.order_id,
            reason: self.reason,
            admin_notes: self.admin_notes.unwrap_or_default(),
            status,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Mutable-field update payload.
///
/// `type`, `amount` and `orderId` are immutable after creation, so they have
/// no representation here; a caller cannot even attempt to change them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentUpdate {
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub admin_notes: Option<String>,
    #[serde(default)]
    pub status: Option<AdjustmentStatus>,
}

impl AdjustmentUpdate {
    /// Effective reason change, if any. Blank-after-trim strings are treated
    /// as "no change", matching the original admin service.
    pub fn effective_reason(&self) -> Option<&str> {
        self.reason.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Effective admin-notes change, if any (same blank rule as `reason`).
    pub fn effective_admin_notes(&self) -> Option<&str> {
        self.admin_notes.as_deref().filter(|s| !s.trim().is_empty())
    }
}
