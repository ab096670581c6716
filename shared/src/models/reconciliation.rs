//! TTB reconciliation records as returned by `ttb.getReconciliationSummary`
//!
//! Every figure here is computed by the backend from a single per-batch
//! ledger. This side only displays, filters and gates on them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::ReportingPeriod;

/// Volume waterfall for one batch or for the whole period, in wine gallons
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Waterfall {
    pub opening: Decimal,
    pub production: Decimal,
    pub losses: Decimal,
    pub sales: Decimal,
    pub distillation: Decimal,
    pub ending: Decimal,
}

impl Waterfall {
    /// Ending volume implied by the flows
    pub fn expected_ending(&self) -> Decimal {
        self.opening + self.production - self.losses - self.sales - self.distillation
    }

    /// `opening + production - losses - sales - distillation - ending`.
    /// Zero when the books balance.
    pub fn identity_check(&self) -> Decimal {
        self.expected_ending() - self.ending
    }

    /// How far the recorded ending sits above the implied ending
    pub fn discrepancy(&self) -> Decimal {
        self.ending - self.expected_ending()
    }

    pub fn sum(items: impl IntoIterator<Item = Waterfall>) -> Waterfall {
        items.into_iter().fold(Waterfall::default(), |acc, w| Waterfall {
            opening: acc.opening + w.opening,
            production: acc.production + w.production,
            losses: acc.losses + w.losses,
            sales: acc.sales + w.sales,
            distillation: acc.distillation + w.distillation,
            ending: acc.ending + w.ending,
        })
    }
}

/// Backend reconciliation metrics for one batch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BatchReconciliation {
    pub batch_id: Uuid,
    pub waterfall: Waterfall,
    /// Signed identity residual in wine gallons
    pub identity_check: Decimal,
    /// Stored current volume minus volume rebuilt from transactions
    pub drift_liters: Decimal,
    #[serde(default)]
    pub initial_volume_anomaly: bool,
    #[serde(default)]
    pub vessel_capacity_exceeded: bool,
}

/// Whole-period reconciliation summary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationSummary {
    pub period: ReportingPeriod,
    pub totals: Waterfall,
    pub identity_check: Decimal,
    #[serde(default)]
    pub is_finalized: bool,
    #[serde(default)]
    pub batches: Vec<BatchReconciliation>,
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
    fn test_balanced_waterfall() {
        let w = waterfall(125);
        assert_eq!(w.expected_ending(), Decimal::from(125));
        assert_eq!(w.identity_check(), Decimal::ZERO);
    }

    #[test]
    fn test_unbalanced_waterfall() {
        let w = waterfall(130);
        assert_eq!(w.identity_check(), Decimal::from(-5));
        assert_eq!(w.discrepancy(), Decimal::from(5));
    }

    #[test]
    fn test_sum() {
        let total = Waterfall::sum([waterfall(125), waterfall(130)]);
        assert_eq!(total.opening, Decimal::from(200));
        assert_eq!(total.identity_check(), Decimal::from(-5));
    }
}
