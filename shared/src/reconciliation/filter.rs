//! Validation-status and TTB-issue filters

use serde::{Deserialize, Serialize};

use super::{DRIFT_TOLERANCE_LITERS, IDENTITY_TOLERANCE_GAL};
use crate::models::{BatchReconciliation, BatchWithValidation, ValidationStatus};
use crate::types::DateRange;

/// Validation-status filter chip
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    Pass,
    Warning,
    Fail,
    Verified,
    CarriedForward,
    NewProduction,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 6] = [
        StatusFilter::Pass,
        StatusFilter::Warning,
        StatusFilter::Fail,
        StatusFilter::Verified,
        StatusFilter::CarriedForward,
        StatusFilter::NewProduction,
    ];

    /// Pass, warning and fail only match unverified batches; verified
    /// batches are counted under `Verified` instead.
    pub fn matches(&self, batch: &BatchWithValidation, period: DateRange) -> bool {
        let unverified_with = |status: ValidationStatus| {
            !batch.verified_for_year && batch.validation.status == status
        };
        match self {
            StatusFilter::Pass => unverified_with(ValidationStatus::Pass),
            StatusFilter::Warning => unverified_with(ValidationStatus::Warning),
            StatusFilter::Fail => unverified_with(ValidationStatus::Fail),
            StatusFilter::Verified => batch.verified_for_year,
            StatusFilter::CarriedForward => batch.batch.start_date < period.start,
            StatusFilter::NewProduction => period.contains(batch.batch.start_date),
        }
    }
}

/// TTB-issue filter chip
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TtbIssue {
    IdentityCheck,
    Drift,
    InitialVolumeAnomaly,
    CapacityExceeded,
}

impl TtbIssue {
    pub const ALL: [TtbIssue; 4] = [
        TtbIssue::IdentityCheck,
        TtbIssue::Drift,
        TtbIssue::InitialVolumeAnomaly,
        TtbIssue::CapacityExceeded,
    ];

    pub fn matches(&self, rec: &BatchReconciliation) -> bool {
        let issues = BatchIssues::from_reconciliation(rec);
        match self {
            TtbIssue::IdentityCheck => issues.identity,
            TtbIssue::Drift => issues.drift,
            TtbIssue::InitialVolumeAnomaly => issues.initial_volume_anomaly,
            TtbIssue::CapacityExceeded => issues.capacity_exceeded,
        }
    }
}

/// The four issue conditions for one batch
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct BatchIssues {
    pub identity: bool,
    pub drift: bool,
    pub initial_volume_anomaly: bool,
    pub capacity_exceeded: bool,
}

impl BatchIssues {
    pub fn from_reconciliation(rec: &BatchReconciliation) -> Self {
        Self {
            identity: rec.identity_check.abs() >= IDENTITY_TOLERANCE_GAL,
            drift: rec.drift_liters.abs() >= DRIFT_TOLERANCE_LITERS,
            initial_volume_anomaly: rec.initial_volume_anomaly,
            capacity_exceeded: rec.vessel_capacity_exceeded,
        }
    }

    pub fn any(&self) -> bool {
        self.identity || self.drift || self.initial_volume_anomaly || self.capacity_exceeded
    }
}

/// Both filter selections. They apply together (AND).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub status: Option<StatusFilter>,
    pub issue: Option<TtbIssue>,
}

impl FilterState {
    /// Clicking the active chip clears it; clicking another replaces it.
    pub fn toggle_status(&mut self, filter: StatusFilter) {
        self.status = if self.status == Some(filter) {
            None
        } else {
            Some(filter)
        };
    }

    /// Select an issue chip, or `None` for "all"
    pub fn select_issue(&mut self, issue: Option<TtbIssue>) {
        self.issue = issue;
    }

    pub fn clear(&mut self) {
        *self = FilterState::default();
    }

    /// A batch without reconciliation metrics never matches an issue chip
    pub fn matches(
        &self,
        batch: &BatchWithValidation,
        rec: Option<&BatchReconciliation>,
        period: DateRange,
    ) -> bool {
        let status_ok = self.status.map_or(true, |f| f.matches(batch, period));
        let issue_ok = match self.issue {
            None => true,
            Some(issue) => rec.map_or(false, |r| issue.matches(r)),
        };
        status_ok && issue_ok
    }
}

/// Chip counts for the status filter bar
pub fn status_counts(batches: &[BatchWithValidation], period: DateRange) -> Vec<(StatusFilter, usize)> {
    StatusFilter::ALL
        .iter()
        .map(|f| (*f, batches.iter().filter(|b| f.matches(b, period)).count()))
        .collect()
}
