//! Auto-verification gate for the reconciliation page
//!
//! When the whole period reconciles cleanly, every unverified batch whose
//! validation passed is bulk-verified once. The tracker remembers which
//! (period, eligible set) keys have already fired so a re-render never
//! submits the same bulk verify twice.

use std::collections::HashSet;

use serde::Serialize;
use uuid::Uuid;

use super::{BatchIssues, IDENTITY_TOLERANCE_GAL};
use crate::models::{BatchWithValidation, ReconciliationSummary, ValidationStatus};
use crate::types::DateRange;

/// Why auto-verify did not fire
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Finalized,
    AggregateIdentityFailed,
    BatchIssues,
    NothingEligible,
    AlreadyFired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoVerifyDecision {
    /// Submit one bulk verify for exactly these ids
    Fire { key: String, batch_ids: Vec<Uuid> },
    Skip(SkipReason),
}

/// Unverified batches whose validation passed, sorted by id
pub fn eligible_batch_ids(batches: &[BatchWithValidation]) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = batches
        .iter()
        .filter(|b| !b.verified_for_year && b.validation.status == ValidationStatus::Pass)
        .map(|b| b.batch.id)
        .collect();
    ids.sort();
    ids
}

/// `start|end|id,id,...` with ids sorted
pub fn memo_key(range: DateRange, sorted_ids: &[Uuid]) -> String {
    let ids: Vec<String> = sorted_ids.iter().map(Uuid::to_string).collect();
    format!("{}|{}|{}", range.start, range.end, ids.join(","))
}

#[derive(Debug, Default)]
pub struct AutoVerifyTracker {
    fired: HashSet<String>,
}

impl AutoVerifyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether to fire, recording the key when it does. A key is
    /// never released, even if the bulk verify later fails.
    pub fn evaluate(
        &mut self,
        range: DateRange,
        batches: &[BatchWithValidation],
        summary: &ReconciliationSummary,
    ) -> AutoVerifyDecision {
        if summary.is_finalized {
            return AutoVerifyDecision::Skip(SkipReason::Finalized);
        }
        if summary.identity_check.abs() >= IDENTITY_TOLERANCE_GAL {
            return AutoVerifyDecision::Skip(SkipReason::AggregateIdentityFailed);
        }

        let has_issues = summary.batches.iter().any(|rec| {
            let issues = BatchIssues::from_reconciliation(rec);
            issues.drift || issues.initial_volume_anomaly || issues.capacity_exceeded
        });
        if has_issues {
            return AutoVerifyDecision::Skip(SkipReason::BatchIssues);
        }

        let batch_ids = eligible_batch_ids(batches);
        if batch_ids.is_empty() {
            return AutoVerifyDecision::Skip(SkipReason::NothingEligible);
        }

        let key = memo_key(range, &batch_ids);
        if !self.fired.insert(key.clone()) {
            return AutoVerifyDecision::Skip(SkipReason::AlreadyFired);
        }

        AutoVerifyDecision::Fire { key, batch_ids }
    }

    pub fn has_fired(&self, key: &str) -> bool {
        self.fired.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Batch, BatchReconciliation, BatchStage, BatchValidation, ProductType,
        ReconciliationStatus, Waterfall,
    };
    use crate::types::ReportingPeriod;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn range() -> DateRange {
        ReportingPeriod::annual(2024).date_range().unwrap()
    }

    fn batch(status: ValidationStatus, verified: bool) -> BatchWithValidation {
        BatchWithValidation {
            batch: Batch {
                id: Uuid::new_v4(),
                name: "B".to_string(),
                batch_number: None,
                vessel_id: None,
                vessel_name: None,
                product_type: ProductType::Cider,
                stage: BatchStage::Aging,
                start_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                initial_volume_liters: Decimal::from(100),
                current_volume_liters: Decimal::from(100),
                ending_volume_liters: None,
                reconciliation_status: ReconciliationStatus::Pending,
            },
            validation: BatchValidation {
                status,
                messages: vec![],
            },
            verified_for_year: verified,
        }
    }

    fn summary(identity: Decimal, recs: Vec<BatchReconciliation>) -> ReconciliationSummary {
        ReconciliationSummary {
            period: ReportingPeriod::annual(2024),
            totals: Waterfall::default(),
            identity_check: identity,
            is_finalized: false,
            batches: recs,
        }
    }

    #[test]
    fn test_fires_for_eligible_only() {
        let batches = vec![
            batch(ValidationStatus::Pass, false),
            batch(ValidationStatus::Warning, false),
            batch(ValidationStatus::Pass, true),
        ];
        let mut tracker = AutoVerifyTracker::new();
        match tracker.evaluate(range(), &batches, &summary(Decimal::ZERO, vec![])) {
            AutoVerifyDecision::Fire { batch_ids, key } => {
                assert_eq!(batch_ids, vec![batches[0].batch.id]);
                assert!(tracker.has_fired(&key));
            }
            other => panic!("expected fire, got {:?}", other),
        }
    }

    #[test]
    fn test_fires_once_per_key() {
        let batches = vec![batch(ValidationStatus::Pass, false)];
        let mut tracker = AutoVerifyTracker::new();
        let s = summary(Decimal::ZERO, vec![]);
        assert!(matches!(
            tracker.evaluate(range(), &batches, &s),
            AutoVerifyDecision::Fire { .. }
        ));
        assert_eq!(
            tracker.evaluate(range(), &batches, &s),
            AutoVerifyDecision::Skip(SkipReason::AlreadyFired)
        );
    }

    #[test]
    fn test_gates() {
        let batches = vec![batch(ValidationStatus::Pass, false)];
        let mut tracker = AutoVerifyTracker::new();

        let failing = summary(Decimal::new(25, 2), vec![]);
        assert_eq!(
            tracker.evaluate(range(), &batches, &failing),
            AutoVerifyDecision::Skip(SkipReason::AggregateIdentityFailed)
        );

        let mut finalized = summary(Decimal::ZERO, vec![]);
        finalized.is_finalized = true;
        assert_eq!(
            tracker.evaluate(range(), &batches, &finalized),
            AutoVerifyDecision::Skip(SkipReason::Finalized)
        );

        let drifting = summary(
            Decimal::ZERO,
            vec![BatchReconciliation {
                batch_id: batches[0].batch.id,
                waterfall: Waterfall::default(),
                identity_check: Decimal::ZERO,
                drift_liters: Decimal::from(2),
                initial_volume_anomaly: false,
                vessel_capacity_exceeded: false,
            }],
        );
        assert_eq!(
            tracker.evaluate(range(), &batches, &drifting),
            AutoVerifyDecision::Skip(SkipReason::BatchIssues)
        );

        let none: Vec<BatchWithValidation> = vec![batch(ValidationStatus::Fail, false)];
        assert_eq!(
            tracker.evaluate(range(), &none, &summary(Decimal::ZERO, vec![])),
            AutoVerifyDecision::Skip(SkipReason::NothingEligible)
        );
    }

    #[test]
    fn test_memo_key_format() {
        let id = Uuid::nil();
        assert_eq!(
            memo_key(range(), &[id]),
            "2024-01-01|2024-12-31|00000000-0000-0000-0000-000000000000"
        );
    }
}
