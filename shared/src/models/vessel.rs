//! Fermentation vessel models (tanks and barrels)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::units::{to_liters, VolumeUnit};

/// A tank, barrel or carboy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vessel {
    pub id: Uuid,
    pub name: String,
    pub capacity: Decimal,
    pub capacity_unit: VolumeUnit,
    /// Usable volume below headspace, in `capacity_unit`
    pub working_capacity: Option<Decimal>,
    pub material: VesselMaterial,
    #[serde(default)]
    pub jacketed: bool,
    #[serde(default)]
    pub is_pressure_vessel: bool,
    #[serde(default)]
    pub is_barrel: bool,
    pub barrel: Option<BarrelAttributes>,
    pub status: VesselStatus,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Vessel {
    /// Max capacity in liters. `None` when it does not fit in a `Decimal`,
    /// which no representable volume can exceed.
    pub fn capacity_liters(&self) -> Option<Decimal> {
        to_liters(self.capacity, self.capacity_unit)
    }

    pub fn working_capacity_liters(&self) -> Option<Decimal> {
        self.working_capacity
            .and_then(|w| to_liters(w, self.capacity_unit))
    }
}

/// Vessel construction material
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VesselMaterial {
    StainlessSteel,
    Plastic,
    Wood,
    Glass,
    Other,
}

impl std::fmt::Display for VesselMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VesselMaterial::StainlessSteel => write!(f, "Stainless Steel"),
            VesselMaterial::Plastic => write!(f, "Plastic"),
            VesselMaterial::Wood => write!(f, "Wood"),
            VesselMaterial::Glass => write!(f, "Glass"),
            VesselMaterial::Other => write!(f, "Other"),
        }
    }
}

/// Operational status of a vessel
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VesselStatus {
    Available,
    Cleaning,
    Maintenance,
}

/// Barrel-only attributes
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BarrelAttributes {
    pub origin_type_id: Option<Uuid>,
    pub toast_level: Option<ToastLevel>,
    pub year_acquired: Option<i32>,
    /// What the barrel held before (bourbon, wine, ...)
    pub previous_contents: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ToastLevel {
    Light,
    Medium,
    MediumPlus,
    Heavy,
    Charred,
}

/// Lookup entry for barrel origins (e.g. "Bourbon", "Sherry")
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarrelOriginType {
    pub id: Uuid,
    pub name: String,
    pub is_active: bool,
}

/// Vessel map entry: a vessel together with whatever it currently holds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VesselLiquid {
    pub vessel: Vessel,
    pub batch_id: Option<Uuid>,
    pub batch_name: Option<String>,
    #[serde(default)]
    pub current_volume_liters: Decimal,
}

impl VesselLiquid {
    pub fn has_liquid(&self) -> bool {
        self.batch_id.is_some() && self.current_volume_liters > Decimal::ZERO
    }

    /// Fill level as a percentage of max capacity
    pub fn fill_percent(&self) -> Option<Decimal> {
        let capacity = self.vessel.capacity_liters()?;
        if capacity.is_zero() {
            return None;
        }
        self.current_volume_liters
            .checked_div(capacity)?
            .checked_mul(Decimal::ONE_HUNDRED)
    }
}

/// Input for creating or editing a vessel
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "crate::validation::validate_vessel_input"))]
pub struct VesselInput {
    #[validate(length(min = 1, max = 100, message = "Vessel name is required"))]
    pub name: String,
    #[validate(custom = "crate::validation::validate_positive")]
    pub capacity: Decimal,
    pub capacity_unit: VolumeUnit,
    pub working_capacity: Option<Decimal>,
    pub material: VesselMaterial,
    #[serde(default)]
    pub jacketed: bool,
    #[serde(default)]
    pub is_pressure_vessel: bool,
    #[serde(default)]
    pub is_barrel: bool,
    pub barrel: Option<BarrelAttributes>,
    pub location: Option<String>,
}

impl VesselInput {
    /// Wood vessels and anything flagged as a barrel take barrel attributes
    pub fn is_barrel_like(&self) -> bool {
        self.is_barrel || self.material == VesselMaterial::Wood
    }

    /// Drop attributes that do not apply to the chosen material, so that a
    /// form switched from stainless to wood does not carry stale flags.
    pub fn normalized(mut self) -> Self {
        if self.material != VesselMaterial::StainlessSteel {
            self.jacketed = false;
            self.is_pressure_vessel = false;
        }
        if !self.is_barrel_like() {
            self.barrel = None;
        }
        self
    }
}

/// Input for changing a vessel's status
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVesselStatusInput {
    pub id: Uuid,
    pub status: VesselStatus,
}
