//! TTB batch reconciliation: filtering, sorting, waterfall display and
//! auto-verification
//!
//! The backend computes every reconciliation figure. This module decides
//! which batches to show, in what order, how their checks are coloured and
//! when the eligible set may be bulk-verified.

mod auto_verify;
mod filter;
mod indicators;
mod sort;
mod view;

use std::collections::HashMap;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{BatchReconciliation, BatchWithValidation, ReconciliationSummary};
use crate::types::DateRange;

pub use auto_verify::*;
pub use filter::*;
pub use indicators::*;
pub use sort::*;
pub use view::*;

/// Identity residual (wine gallons) at or above which a batch is flagged
pub const IDENTITY_TOLERANCE_GAL: Decimal = Decimal::from_parts(25, 0, 0, false, 2);

/// Drift (liters) at or above which a batch is flagged
pub const DRIFT_TOLERANCE_LITERS: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Reconciliation metrics keyed by batch id
pub type ReconciliationMap = HashMap<Uuid, BatchReconciliation>;

/// Index a summary's per-batch records by batch id
pub fn index_by_batch(summary: &ReconciliationSummary) -> ReconciliationMap {
    summary
        .batches
        .iter()
        .map(|rec| (rec.batch_id, rec.clone()))
        .collect()
}

/// Run the full pipeline: status filter, then TTB-issue filter, then sort.
pub fn apply_pipeline<'a>(
    batches: &'a [BatchWithValidation],
    reconciliation: &ReconciliationMap,
    filters: &FilterState,
    sort: Option<SortState>,
    period: DateRange,
) -> Vec<&'a BatchWithValidation> {
    let mut rows: Vec<&BatchWithValidation> = batches
        .iter()
        .filter(|b| filters.matches(b, reconciliation.get(&b.batch.id), period))
        .collect();

    if let Some(sort) = sort {
        sort_batches(&mut rows, sort, reconciliation);
    }

    rows
}
