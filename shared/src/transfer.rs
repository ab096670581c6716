//! Vessel-to-vessel transfer checks and the blend confirmation workflow
//!
//! A transfer is checked against the source's current volume (with a small
//! tolerance for display rounding) and the destination's capacity. If the
//! destination already holds liquid the user must confirm the blend before
//! the transfer can be committed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::VesselLiquid;
use crate::units::{convert_volume, to_liters, VolumeUnit};

/// Rounding slack when comparing volume used against volume on hand
/// (about 0.05 gal).
pub const TRANSFER_EPSILON_LITERS: Decimal = Decimal::from_parts(2, 0, 0, false, 1);

/// Transfer form as entered, in the user's display unit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub source_vessel_id: Uuid,
    pub destination_vessel_id: Uuid,
    pub batch_id: Uuid,
    pub transfer_volume: Decimal,
    #[serde(default)]
    pub loss: Decimal,
    pub unit: VolumeUnit,
    pub notes: Option<String>,
}

/// How full the destination would be after the transfer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FillLevel {
    WithinCapacity,
    /// Over working capacity but under max. Warn only.
    AboveWorkingCapacity,
    /// Over max capacity. Blocks submission.
    AboveMaxCapacity,
}

/// Result of checking a transfer form
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransferCheck {
    /// `current - transfer - loss`, in the request's unit
    pub remaining: Decimal,
    pub remaining_liters: Decimal,
    pub total_used_liters: Decimal,
    pub destination_after_liters: Decimal,
    pub fill_level: FillLevel,
    pub requires_blend_confirmation: bool,
    pub errors: Vec<&'static str>,
    pub warnings: Vec<&'static str>,
}

impl TransferCheck {
    pub fn can_submit(&self) -> bool {
        self.errors.is_empty()
    }
}

const VOLUME_OUT_OF_RANGE: &str = "Transfer volume is too large";

/// Volumes derived from a transfer form. `None` from [`TransferVolumes::compute`]
/// means some figure did not fit in a `Decimal`.
struct TransferVolumes {
    remaining: Decimal,
    remaining_liters: Decimal,
    total_used_liters: Decimal,
    destination_after_liters: Decimal,
}

impl TransferVolumes {
    fn compute(
        source: &VesselLiquid,
        destination: &VesselLiquid,
        request: &TransferRequest,
    ) -> Option<Self> {
        let current_liters = source.current_volume_liters;
        let current = convert_volume(current_liters, VolumeUnit::Liters, request.unit)?;
        let remaining = current
            .checked_sub(request.transfer_volume)?
            .checked_sub(request.loss)?;

        let used = request.transfer_volume.checked_add(request.loss)?;
        let total_used_liters = to_liters(used, request.unit)?;
        let incoming_liters = to_liters(request.transfer_volume, request.unit)?;

        Some(Self {
            remaining,
            remaining_liters: current_liters.checked_sub(total_used_liters)?,
            total_used_liters,
            destination_after_liters: destination
                .current_volume_liters
                .checked_add(incoming_liters)?,
        })
    }
}

/// Check a transfer from `source` into `destination`
pub fn check_transfer(
    source: &VesselLiquid,
    destination: &VesselLiquid,
    request: &TransferRequest,
) -> TransferCheck {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if request.transfer_volume <= Decimal::ZERO {
        errors.push("Transfer volume must be greater than zero");
    }
    if request.loss < Decimal::ZERO {
        errors.push("Loss cannot be negative");
    }
    if source.vessel.id == destination.vessel.id {
        errors.push("Source and destination must be different vessels");
    }

    let requires_blend_confirmation = destination.has_liquid();

    let Some(volumes) = TransferVolumes::compute(source, destination, request) else {
        errors.push(VOLUME_OUT_OF_RANGE);
        return TransferCheck {
            remaining: Decimal::ZERO,
            remaining_liters: Decimal::ZERO,
            total_used_liters: Decimal::ZERO,
            destination_after_liters: destination.current_volume_liters,
            fill_level: FillLevel::AboveMaxCapacity,
            requires_blend_confirmation,
            errors,
            warnings,
        };
    };

    let allowed_liters = source
        .current_volume_liters
        .saturating_add(TRANSFER_EPSILON_LITERS);
    if volumes.total_used_liters > allowed_liters {
        errors.push("Transfer and loss exceed the volume in the source vessel");
    }

    let fill_level = fill_level(destination, volumes.destination_after_liters);
    match fill_level {
        FillLevel::AboveMaxCapacity => errors.push("Transfer would overfill the destination vessel"),
        FillLevel::AboveWorkingCapacity => {
            warnings.push("Transfer exceeds the destination's working capacity")
        }
        FillLevel::WithinCapacity => {}
    }

    if requires_blend_confirmation {
        warnings.push("Destination already holds liquid; the batches will be blended");
    }

    TransferCheck {
        remaining: volumes.remaining,
        remaining_liters: volumes.remaining_liters,
        total_used_liters: volumes.total_used_liters,
        destination_after_liters: volumes.destination_after_liters,
        fill_level,
        requires_blend_confirmation,
        errors,
        warnings,
    }
}

fn fill_level(destination: &VesselLiquid, after_liters: Decimal) -> FillLevel {
    let over_max = destination
        .vessel
        .capacity_liters()
        .is_some_and(|capacity| after_liters > capacity);
    if over_max {
        return FillLevel::AboveMaxCapacity;
    }
    match destination.vessel.working_capacity_liters() {
        Some(working) if after_liters > working => FillLevel::AboveWorkingCapacity,
        _ => FillLevel::WithinCapacity,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("{0}")]
    Blocked(String),
    #[error("transfer is not awaiting blend confirmation")]
    NotAwaitingConfirmation,
    #[error("transfer has already been committed")]
    AlreadyCommitted,
    #[error("{}", VOLUME_OUT_OF_RANGE)]
    VolumeOutOfRange,
}

/// A transfer that passed every check and, where needed, was confirmed as a
/// blend. Only [`TransferWorkflow`] constructs one.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedTransfer {
    source_vessel_id: Uuid,
    destination_vessel_id: Uuid,
    batch_id: Uuid,
    volume_liters: Decimal,
    loss_liters: Decimal,
    blend_confirmed: bool,
    notes: Option<String>,
}

impl ConfirmedTransfer {
    fn from_request(request: &TransferRequest, blend_confirmed: bool) -> Result<Self, TransferError> {
        let liters = |value| to_liters(value, request.unit).ok_or(TransferError::VolumeOutOfRange);
        Ok(Self {
            source_vessel_id: request.source_vessel_id,
            destination_vessel_id: request.destination_vessel_id,
            batch_id: request.batch_id,
            volume_liters: liters(request.transfer_volume)?,
            loss_liters: liters(request.loss)?,
            blend_confirmed,
            notes: request.notes.clone(),
        })
    }

    pub fn source_vessel_id(&self) -> Uuid {
        self.source_vessel_id
    }

    pub fn destination_vessel_id(&self) -> Uuid {
        self.destination_vessel_id
    }

    pub fn batch_id(&self) -> Uuid {
        self.batch_id
    }

    pub fn volume_liters(&self) -> Decimal {
        self.volume_liters
    }

    pub fn loss_liters(&self) -> Decimal {
        self.loss_liters
    }

    pub fn blend_confirmed(&self) -> bool {
        self.blend_confirmed
    }
}

/// Draft -> (PendingConfirmation) -> Committed
#[derive(Debug, Clone, PartialEq)]
pub enum TransferWorkflow {
    Draft(TransferRequest),
    PendingConfirmation {
        request: TransferRequest,
        destination_batch_name: Option<String>,
    },
    Committed(ConfirmedTransfer),
}

impl TransferWorkflow {
    pub fn new(request: TransferRequest) -> Self {
        TransferWorkflow::Draft(request)
    }

    /// Submit a draft. Blocked checks keep it a draft; a blend moves it to
    /// pending confirmation; anything else commits straight away.
    pub fn submit(
        self,
        check: &TransferCheck,
        destination: &VesselLiquid,
    ) -> Result<TransferWorkflow, TransferError> {
        let request = match self {
            TransferWorkflow::Draft(request) => request,
            TransferWorkflow::PendingConfirmation { .. } => {
                return Err(TransferError::NotAwaitingConfirmation)
            }
            TransferWorkflow::Committed(_) => return Err(TransferError::AlreadyCommitted),
        };

        if !check.can_submit() {
            return Err(TransferError::Blocked(check.errors.join("; ")));
        }

        if check.requires_blend_confirmation {
            Ok(TransferWorkflow::PendingConfirmation {
                request,
                destination_batch_name: destination.batch_name.clone(),
            })
        } else {
            Ok(TransferWorkflow::Committed(ConfirmedTransfer::from_request(
                &request, false,
            )?))
        }
    }

    /// Confirm a pending blend
    pub fn confirm(self) -> Result<TransferWorkflow, TransferError> {
        match self {
            TransferWorkflow::PendingConfirmation { request, .. } => Ok(
                TransferWorkflow::Committed(ConfirmedTransfer::from_request(&request, true)?),
            ),
            TransferWorkflow::Committed(_) => Err(TransferError::AlreadyCommitted),
            TransferWorkflow::Draft(_) => Err(TransferError::NotAwaitingConfirmation),
        }
    }

    /// Back out of a pending blend, keeping the form values
    pub fn cancel(self) -> TransferWorkflow {
        match self {
            TransferWorkflow::PendingConfirmation { request, .. } => TransferWorkflow::Draft(request),
            other => other,
        }
    }

    pub fn committed(&self) -> Option<&ConfirmedTransfer> {
        match self {
            TransferWorkflow::Committed(transfer) => Some(transfer),
            _ => None,
        }
    }
}
