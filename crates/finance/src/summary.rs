//! Totals and per-type summaries for financial reporting.
//!
//! Pure, reentrant functions over already-fetched adjustment collections.
//! Only approved/applied records contribute; pending ones are invisible to
//! every figure computed here.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::adjustment::{AccountingAdjustment, AdjustmentType};

/// Sum of adjustment amounts, optionally restricted to one type.
///
/// Returns zero for empty or all-pending input.
pub fn total_for(adjustments: &[AccountingAdjustment], kind: Option<AdjustmentType>) -> Decimal {
    adjustments
        .iter()
        .filter(|a| a.status.counts_toward_totals())
        .filter(|a| kind.map_or(true, |k| a.kind == k))
        .map(|a| a.amount)
        .sum()
}

/// Fixed-shape summary: one running total per adjustment type plus the
/// grand total across all types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentSummary {
    pub refunds: Decimal,
    pub returns: Decimal,
    pub cancellations: Decimal,
    pub corrections: Decimal,
    pub discounts: Decimal,
    pub fees: Decimal,
    pub total: Decimal,
}

impl AdjustmentSummary {
    /// Running total for one adjustment type.
    pub fn bucket(&self, kind: AdjustmentType) -> Decimal {
        match kind {
            AdjustmentType::Refund => self.refunds,
            AdjustmentType::Return => self.returns,
            AdjustmentType::Cancellation => self.cancellations,
            AdjustmentType::Correction => self.corrections,
            AdjustmentType::Discount => self.discounts,
            AdjustmentType::Fee => self.fees,
        }
    }

    fn bucket_mut(&mut self, kind: AdjustmentType) -> &mut Decimal {
        match kind {
            AdjustmentType::Refund => &mut self.refunds,
            AdjustmentType::Return => &mut self.returns,
            AdjustmentType::Cancellation => &mut self.cancellations,
            AdjustmentType::Discount => &mut self.discounts,
            AdjustmentType::Correction => &mut self.corrections,
            AdjustmentType::Fee => &mut self.fees,
        }
    }
}

/// Accumulate per-type buckets and the grand total over a collection.
///
/// Every counted amount lands in exactly one bucket and in `total`, so the
/// buckets always partition the grand total.
pub fn summarize(adjustments: &[AccountingAdjustment]) -> AdjustmentSummary {
    let mut summary = AdjustmentSummary::default();

    for adjustment in adjustments {
        if !adjustment.status.counts_toward_totals() {
            continue;
        }

        *summary.bucket_mut(adjustment.kind) += adjustment.amount;
        summary.total += adjustment.amount;
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjustment::{AdjustmentId, AdjustmentStatus};
    use chrono::Utc;
    use proptest::prelude::*;
    use shopledger_core::DocumentId;

    fn test_adjustment(
        kind: AdjustmentType,
        amount: Decimal,
        status: AdjustmentStatus,
    ) -> AccountingAdjustment {
        AccountingAdjustment {
            id: AdjustmentId::new(DocumentId::new()),
            kind,
            amount,
            order_id: "ORD-1".to_string(),
            reason: "test".to_string(),
            admin_notes: String::new(),
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn empty_input_totals_zero() {
        assert_eq!(total_for(&[], None), Decimal::ZERO);
        assert_eq!(total_for(&[], Some(AdjustmentType::Refund)), Decimal::ZERO);
        assert_eq!(summarize(&[]), AdjustmentSummary::default());
    }

    #[test]
    fn pending_records_are_excluded() {
        let adjustments = vec![
            test_adjustment(
                AdjustmentType::Refund,
                Decimal::from(-100),
                AdjustmentStatus::Approved,
            ),
            test_adjustment(
                AdjustmentType::Fee,
                Decimal::from(50),
                AdjustmentStatus::Pending,
            ),
        ];

        let summary = summarize(&adjustments);
        assert_eq!(summary.refunds, Decimal::from(-100));
        assert_eq!(summary.fees, Decimal::ZERO);
        assert_eq!(summary.total, Decimal::from(-100));

        assert_eq!(total_for(&adjustments, None), Decimal::from(-100));
        assert_eq!(
            total_for(&adjustments, Some(AdjustmentType::Fee)),
            Decimal::ZERO
        );
    }

    #[test]
    fn type_filter_restricts_the_total() {
        let adjustments = vec![
            test_adjustment(
                AdjustmentType::Refund,
                Decimal::from(-200),
                AdjustmentStatus::Applied,
            ),
            test_adjustment(
                AdjustmentType::Discount,
                Decimal::from(-25),
                AdjustmentStatus::Approved,
            ),
            test_adjustment(
                AdjustmentType::Refund,
                Decimal::from(-300),
                AdjustmentStatus::Approved,
            ),
        ];

        assert_eq!(
            total_for(&adjustments, Some(AdjustmentType::Refund)),
            Decimal::from(-500)
        );
        assert_eq!(total_for(&adjustments, None), Decimal::from(-525));
    }

    #[test]
    fn applied_counts_like_approved() {
        let adjustments = vec![test_adjustment(
            AdjustmentType::Cancellation,
            Decimal::new(-1999, 2),
            AdjustmentStatus::Applied,
        )];

        let summary = summarize(&adjustments);
        assert_eq!(summary.cancellations, Decimal::new(-1999, 2));
        assert_eq!(summary.total, Decimal::new(-1999, 2));
    }

    fn arb_kind() -> impl Strategy<Value = AdjustmentType> {
        prop_oneof![
            Just(AdjustmentType::Refund),
            Just(AdjustmentType::Return),
            Just(AdjustmentType::Cancellation),
            Just(AdjustmentType::Correction),
            Just(AdjustmentType::Discount),
            Just(AdjustmentType::Fee),
        ]
    }

    fn arb_status() -> impl Strategy<Value = AdjustmentStatus> {
        prop_oneof![
            Just(AdjustmentStatus::Pending),
            Just(AdjustmentStatus::Approved),
            Just(AdjustmentStatus::Applied),
        ]
    }

    fn arb_adjustment() -> impl Strategy<Value = AccountingAdjustment> {
        (arb_kind(), arb_status(), -1_000_000i64..1_000_000i64)
            .prop_map(|(kind, status, cents)| test_adjustment(kind, Decimal::new(cents, 2), status))
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: the grand total always equals the sum of the six buckets.
        #[test]
        fn summary_total_equals_bucket_sum(
            adjustments in prop::collection::vec(arb_adjustment(), 0..50)
        ) {
            let summary = summarize(&adjustments);
            let bucket_sum: Decimal = AdjustmentType::ALL
                .iter()
                .map(|kind| summary.bucket(*kind))
                .sum();

            prop_assert_eq!(summary.total, bucket_sum);
        }

        /// Property: the unfiltered total and the summary grand total agree,
        /// and per-type totals partition the unfiltered total.
        #[test]
        fn totals_agree_across_both_functions(
            adjustments in prop::collection::vec(arb_adjustment(), 0..50)
        ) {
            let unfiltered = total_for(&adjustments, None);
            prop_assert_eq!(unfiltered, summarize(&adjustments).total);

            let partitioned: Decimal = AdjustmentType::ALL
                .iter()
                .map(|kind| total_for(&adjustments, Some(*kind)))
                .sum();
            prop_assert_eq!(partitioned, unfiltered);
        }

        /// Property: a collection of pending-only records totals zero.
        #[test]
        fn pending_only_input_totals_zero(
            amounts in prop::collection::vec(-1_000_000i64..1_000_000i64, 0..50)
        ) {
            let adjustments: Vec<_> = amounts
                .into_iter()
                .map(|cents| {
                    test_adjustment(
                        AdjustmentType::Fee,
                        Decimal::new(cents, 2),
                        AdjustmentStatus::Pending,
                    )
                })
                .collect();

            prop_assert_eq!(total_for(&adjustments, None), Decimal::ZERO);
            prop_assert_eq!(summarize(&adjustments), AdjustmentSummary::default());
        }
    }
}
