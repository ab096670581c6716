//! Vessel transfer tests
//!
//! Covers volume checks with the 0.2 L rounding allowance, capacity limits
//! and the blend confirmation workflow.

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::transfer::{
    check_transfer, FillLevel, TransferError, TransferRequest, TransferWorkflow,
    TRANSFER_EPSILON_LITERS,
};
use shared::{Vessel, VesselLiquid, VesselMaterial, VesselStatus, VolumeUnit};
use uuid::Uuid;

fn vessel(capacity_liters: i64, working_liters: Option<i64>, contents: i64) -> VesselLiquid {
    VesselLiquid {
        vessel: Vessel {
            id: Uuid::new_v4(),
            name: "Tank".to_string(),
            capacity: Decimal::from(capacity_liters),
            capacity_unit: VolumeUnit::Liters,
            working_capacity: working_liters.map(Decimal::from),
            material: VesselMaterial::StainlessSteel,
            jacketed: false,
            is_pressure_vessel: false,
            is_barrel: false,
            barrel: None,
            status: VesselStatus::Available,
            location: None,
            created_at: Utc::now(),
        },
        batch_id: (contents > 0).then(Uuid::new_v4),
        batch_name: (contents > 0).then(|| "Kingston Black 2024".to_string()),
        current_volume_liters: Decimal::from(contents),
    }
}

fn request(
    source: &VesselLiquid,
    destination: &VesselLiquid,
    volume: Decimal,
    loss: Decimal,
    unit: VolumeUnit,
) -> TransferRequest {
    TransferRequest {
        source_vessel_id: source.vessel.id,
        destination_vessel_id: destination.vessel.id,
        batch_id: source.batch_id.unwrap_or_else(Uuid::new_v4),
        transfer_volume: volume,
        loss,
        unit,
        notes: None,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_gallon_entry_within_rounding_allowance() {
        // 26.42 gal is 100.01 L, just over a 100 L source
        let source = vessel(200, None, 100);
        let destination = vessel(500, None, 0);
        let req = request(&source, &destination, Decimal::new(2642, 2), Decimal::ZERO, VolumeUnit::Gallons);

        let check = check_transfer(&source, &destination, &req);
        assert!(check.can_submit(), "errors: {:?}", check.errors);
        assert!(check.remaining_liters < Decimal::ZERO);
    }

    #[test]
    fn test_overdraw_rejected() {
        let source = vessel(200, None, 100);
        let destination = vessel(500, None, 0);
        let req = request(&source, &destination, Decimal::from(95), Decimal::from(6), VolumeUnit::Liters);

        let check = check_transfer(&source, &destination, &req);
        assert!(!check.can_submit());
    }

    #[test]
    fn test_working_capacity_warns_max_capacity_blocks() {
        let source = vessel(1000, None, 800);
        let destination = vessel(500, Some(450), 0);

        let warn = request(&source, &destination, Decimal::from(480), Decimal::ZERO, VolumeUnit::Liters);
        let check = check_transfer(&source, &destination, &warn);
        assert_eq!(check.fill_level, FillLevel::AboveWorkingCapacity);
        assert!(check.can_submit());
        assert!(!check.warnings.is_empty());

        let over = request(&source, &destination, Decimal::from(501), Decimal::ZERO, VolumeUnit::Liters);
        let check = check_transfer(&source, &destination, &over);
        assert_eq!(check.fill_level, FillLevel::AboveMaxCapacity);
        assert!(!check.can_submit());
    }

    #[test]
    fn test_same_vessel_rejected() {
        let source = vessel(500, None, 300);
        let req = request(&source, &source, Decimal::from(10), Decimal::ZERO, VolumeUnit::Liters);
        assert!(!check_transfer(&source, &source, &req).can_submit());
    }

    #[test]
    fn test_blend_requires_confirmation() {
        let source = vessel(1000, None, 400);
        let destination = vessel(1000, None, 200);
        let req = request(&source, &destination, Decimal::from(100), Decimal::ZERO, VolumeUnit::Liters);
        let check = check_transfer(&source, &destination, &req);
        assert!(check.requires_blend_confirmation);

        let pending = TransferWorkflow::new(req).submit(&check, &destination).unwrap();
        assert!(matches!(pending, TransferWorkflow::PendingConfirmation { .. }));
        assert!(pending.committed().is_none());

        let committed = pending.confirm().unwrap();
        let confirmed = committed.committed().unwrap();
        assert!(confirmed.blend_confirmed());
        assert_eq!(confirmed.volume_liters(), Decimal::from(100));
    }

    #[test]
    fn test_blocked_transfer_never_reaches_confirmation() {
        let source = vessel(1000, None, 50);
        let destination = vessel(1000, None, 200);
        let req = request(&source, &destination, Decimal::from(100), Decimal::ZERO, VolumeUnit::Liters);
        let check = check_transfer(&source, &destination, &req);

        let result = TransferWorkflow::new(req).submit(&check, &destination);
        assert!(matches!(result, Err(TransferError::Blocked(_))));
    }

    #[test]
    fn test_empty_destination_commits_directly() {
        let source = vessel(1000, None, 400);
        let destination = vessel(1000, None, 0);
        let req = request(&source, &destination, Decimal::from(100), Decimal::from(2), VolumeUnit::Liters);
        let check = check_transfer(&source, &destination, &req);

        let workflow = TransferWorkflow::new(req).submit(&check, &destination).unwrap();
        let confirmed = workflow.committed().unwrap();
        assert!(!confirmed.blend_confirmed());
        assert_eq!(confirmed.loss_liters(), Decimal::from(2));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Transfer plus loss may exceed the source by at most 0.2 L
    #[test]
    fn prop_transfer_allowance(
        contents in 1i64..2000,
        transfer_cl in 1i64..250_000,
        loss_cl in 0i64..2_000,
    ) {
        let source = vessel(5000, None, contents);
        let destination = vessel(100_000, None, 0);
        let volume = Decimal::new(transfer_cl, 2);
        let loss = Decimal::new(loss_cl, 2);
        let req = request(&source, &destination, volume, loss, VolumeUnit::Liters);

        let check = check_transfer(&source, &destination, &req);
        let within = volume + loss <= Decimal::from(contents) + TRANSFER_EPSILON_LITERS;
        prop_assert_eq!(check.can_submit(), within);
    }

    /// Entering the same transfer in liters or milliliters gives the same verdict
    #[test]
    fn prop_unit_entry_does_not_change_verdict(contents in 1i64..500, transfer_ml in 1i64..600_000) {
        let source = vessel(1000, None, contents);
        let destination = vessel(100_000, None, 0);

        let ml = request(&source, &destination, Decimal::from(transfer_ml), Decimal::ZERO, VolumeUnit::Milliliters);
        let liters = request(&source, &destination, Decimal::new(transfer_ml, 3), Decimal::ZERO, VolumeUnit::Liters);

        prop_assert_eq!(
            check_transfer(&source, &destination, &ml).can_submit(),
            check_transfer(&source, &destination, &liters).can_submit()
        );
    }

    /// Volumes anywhere in the `Decimal` range give a verdict instead of a panic,
    /// and a volume too large to convert is never submittable
    #[test]
    fn prop_any_volume_gives_a_verdict(
        (lo, mid, hi) in (any::<u32>(), any::<u32>(), any::<u32>()),
        scale in 0u32..=28,
        loss_cl in 0i64..2_000,
    ) {
        let source = vessel(1000, None, 400);
        let destination = vessel(2000, None, 0);
        let volume = Decimal::from_parts(lo, mid, hi, false, scale);
        let req = request(&source, &destination, volume, Decimal::new(loss_cl, 2), VolumeUnit::Gallons);

        let check = check_transfer(&source, &destination, &req);
        if volume > Decimal::from(1000) {
            prop_assert!(!check.can_submit());
        }
    }
}
