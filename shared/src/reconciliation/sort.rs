//! Single-column sort for the reconciliation table

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::ReconciliationMap;
use crate::models::{BatchWithValidation, ValidationStatus};
use crate::types::SortDirection;

/// Sortable reconciliation table columns
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Name,
    ProductType,
    StartDate,
    InitialVolume,
    EndingVolume,
    /// Reconciled ending volume in wine gallons
    Gallons,
    VesselName,
    Validation,
    Drift,
}

impl SortField {
    pub const ALL: [SortField; 9] = [
        SortField::Name,
        SortField::ProductType,
        SortField::StartDate,
        SortField::InitialVolume,
        SortField::EndingVolume,
        SortField::Gallons,
        SortField::VesselName,
        SortField::Validation,
        SortField::Drift,
    ];
}

/// Active sort column and direction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortState {
    pub fn ascending(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Asc,
        }
    }

    /// Header click: the same column flips direction, a new column starts
    /// ascending.
    pub fn toggle(current: Option<SortState>, field: SortField) -> SortState {
        match current {
            Some(state) if state.field == field => SortState {
                field,
                direction: state.direction.flipped(),
            },
            _ => SortState::ascending(field),
        }
    }
}

/// Rank used by the validation column: fail < warning < pass < verified
pub fn validation_rank(batch: &BatchWithValidation) -> u8 {
    if batch.verified_for_year {
        return 3;
    }
    match batch.validation.status {
        ValidationStatus::Fail => 0,
        ValidationStatus::Warning => 1,
        ValidationStatus::Pass => 2,
    }
}

fn compare(
    a: &BatchWithValidation,
    b: &BatchWithValidation,
    field: SortField,
    reconciliation: &ReconciliationMap,
) -> Ordering {
    match field {
        SortField::Name => a.batch.name.to_lowercase().cmp(&b.batch.name.to_lowercase()),
        SortField::ProductType => a.batch.product_type.label().cmp(b.batch.product_type.label()),
        SortField::StartDate => a.batch.start_date.cmp(&b.batch.start_date),
        SortField::InitialVolume => a
            .batch
            .initial_volume_liters
            .cmp(&b.batch.initial_volume_liters),
        SortField::EndingVolume => {
            let ending = |x: &BatchWithValidation| {
                x.batch
                    .ending_volume_liters
                    .unwrap_or(x.batch.current_volume_liters)
            };
            ending(a).cmp(&ending(b))
        }
        SortField::Gallons => {
            let gallons = |x: &BatchWithValidation| {
                reconciliation.get(&x.batch.id).map(|r| r.waterfall.ending)
            };
            gallons(a).cmp(&gallons(b))
        }
        SortField::VesselName => {
            let vessel = |x: &BatchWithValidation| x.batch.vessel_name.as_ref().map(|n| n.to_lowercase());
            vessel(a).cmp(&vessel(b))
        }
        SortField::Validation => validation_rank(a).cmp(&validation_rank(b)),
        SortField::Drift => {
            let drift = |x: &BatchWithValidation| {
                reconciliation.get(&x.batch.id).map(|r| r.drift_liters.abs())
            };
            drift(a).cmp(&drift(b))
        }
    }
}

/// Stable sort in place. Missing values sort first when ascending.
pub fn sort_batches(
    rows: &mut [&BatchWithValidation],
    sort: SortState,
    reconciliation: &ReconciliationMap,
) {
    rows.sort_by(|a, b| {
        let ordering = compare(a, b, sort.field, reconciliation);
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}
