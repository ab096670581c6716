//! Check indicators shown in an expanded reconciliation row

use rust_decimal::Decimal;
use serde::Serialize;

use super::{BatchIssues, DRIFT_TOLERANCE_LITERS, IDENTITY_TOLERANCE_GAL};
use crate::models::{BatchReconciliation, Waterfall};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    Identity,
    Drift,
    InitialVolume,
    VesselCapacity,
}

/// Badge colour
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Badge {
    Green,
    Red,
}

/// One pass/fail badge
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckIndicator {
    pub kind: CheckKind,
    pub passed: bool,
    pub badge: Badge,
    /// "OK" or "FAIL"
    pub label: &'static str,
    /// Offending amount, when the check has one
    pub value: Option<Decimal>,
}

impl CheckIndicator {
    fn new(kind: CheckKind, passed: bool, value: Option<Decimal>) -> Self {
        Self {
            kind,
            passed,
            badge: if passed { Badge::Green } else { Badge::Red },
            label: if passed { "OK" } else { "FAIL" },
            value,
        }
    }

    /// Identity badge from a signed residual. The value shown is how far
    /// the recorded ending sits above the implied ending.
    pub fn identity(identity_check: Decimal) -> Self {
        let passed = identity_check.abs() < IDENTITY_TOLERANCE_GAL;
        Self::new(CheckKind::Identity, passed, Some(-identity_check))
    }

    /// Identity badge computed straight from a waterfall
    pub fn identity_from_waterfall(waterfall: &Waterfall) -> Self {
        Self::identity(waterfall.identity_check())
    }

    pub fn drift(drift_liters: Decimal) -> Self {
        let passed = drift_liters.abs() < DRIFT_TOLERANCE_LITERS;
        Self::new(CheckKind::Drift, passed, Some(drift_liters))
    }
}

/// The four badges for a batch, in display order
pub fn check_indicators(rec: &BatchReconciliation) -> [CheckIndicator; 4] {
    let issues = BatchIssues::from_reconciliation(rec);
    [
        CheckIndicator::identity(rec.identity_check),
        CheckIndicator::drift(rec.drift_liters),
        CheckIndicator::new(CheckKind::InitialVolume, !issues.initial_volume_anomaly, None),
        CheckIndicator::new(CheckKind::VesselCapacity, !issues.capacity_exceeded, None),
    ]
}

/// Waterfall lines as shown in the expanded row
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaterfallBreakdown {
    pub waterfall: Waterfall,
    pub expected_ending: Decimal,
    pub identity_check: Decimal,
    pub discrepancy: Decimal,
}

impl WaterfallBreakdown {
    pub fn from_waterfall(waterfall: Waterfall) -> Self {
        Self {
            expected_ending: waterfall.expected_ending(),
            identity_check: waterfall.identity_check(),
            discrepancy: waterfall.discrepancy(),
            waterfall,
        }
    }

    /// Printable lines, rounded for display only
    pub fn lines(&self, decimal_places: u32) -> Vec<(&'static str, String)> {
        let fmt = |v: Decimal| format!("{:.*}", decimal_places as usize, v.round_dp(decimal_places));
        let w = &self.waterfall;
        vec![
            ("Opening", fmt(w.opening)),
            ("+ Production", fmt(w.production)),
            ("- Losses", fmt(w.losses)),
            ("- Sales", fmt(w.sales)),
            ("- Distillation", fmt(w.distillation)),
            ("= Expected ending", fmt(self.expected_ending)),
            ("Recorded ending", fmt(w.ending)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn waterfall(ending: i64) -> Waterfall {
        Waterfall {
            opening: Decimal::from(100),
            production: Decimal::from(50),
            losses: Decimal::from(5),
            sales: Decimal::from(20),
            distillation: Decimal::ZERO,
            ending: Decimal::from(ending),
        }
    }

    #[test]
    fn test_balanced_identity_is_green_ok() {
        let indicator = CheckIndicator::identity_from_waterfall(&waterfall(125));
        assert!(indicator.passed);
        assert_eq!(indicator.badge, Badge::Green);
        assert_eq!(indicator.label, "OK");
    }

    #[test]
    fn test_unbalanced_identity_is_red_fail_with_drift() {
        let indicator = CheckIndicator::identity_from_waterfall(&waterfall(130));
        assert!(!indicator.passed);
        assert_eq!(indicator.badge, Badge::Red);
        assert_eq!(indicator.label, "FAIL");
        assert_eq!(indicator.value, Some(Decimal::from(5)));
    }

    #[test]
    fn test_breakdown_lines() {
        let breakdown = WaterfallBreakdown::from_waterfall(waterfall(125));
        let lines = breakdown.lines(1);
        assert_eq!(lines[0], ("Opening", "100.0".to_string()));
        assert_eq!(lines[5], ("= Expected ending", "125.0".to_string()));
    }
}
