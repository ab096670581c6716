//! Vessel service: tanks, barrels and the cellar map

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;
use shared::{
    BarrelOriginType, UpdateVesselStatusInput, Vessel, VesselInput, VesselLiquid, VesselStatus,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::external::RpcClient;

const VESSEL_GROUPS: &[&str] = &["vessel."];

/// Cellar map totals
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CellarSummary {
    pub vessel_count: usize,
    pub in_use: usize,
    pub available: usize,
    pub cleaning: usize,
    pub maintenance: usize,
}

impl CellarSummary {
    pub fn from_map(map: &[VesselLiquid]) -> Self {
        let count = |status: VesselStatus| map.iter().filter(|v| v.vessel.status == status).count();
        Self {
            vessel_count: map.len(),
            in_use: map.iter().filter(|v| v.has_liquid()).count(),
            available: count(VesselStatus::Available),
            cleaning: count(VesselStatus::Cleaning),
            maintenance: count(VesselStatus::Maintenance),
        }
    }
}

/// One tile on the cellar map
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellarEntry {
    #[serde(flatten)]
    pub liquid: VesselLiquid,
    /// Percent of max capacity in use, absent when capacity is zero
    pub fill_percent: Option<Decimal>,
}

impl From<VesselLiquid> for CellarEntry {
    fn from(liquid: VesselLiquid) -> Self {
        Self {
            fill_percent: liquid.fill_percent().map(|p| p.round_dp(1)),
            liquid,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellarMap {
    pub summary: CellarSummary,
    pub vessels: Vec<CellarEntry>,
}

#[derive(Clone)]
pub struct VesselService {
    rpc: Arc<RpcClient>,
}

impl VesselService {
    pub fn new(rpc: Arc<RpcClient>) -> Self {
        Self { rpc }
    }

    pub async fn list(&self) -> AppResult<Vec<Vessel>> {
        self.rpc.query("vessel.list", &json!({})).await
    }

    /// Every vessel with whatever it currently holds
    pub async fn liquid_map(&self) -> AppResult<Vec<VesselLiquid>> {
        self.rpc.query("vessel.liquidMap", &json!({})).await
    }

    pub async fn cellar_map(&self) -> AppResult<CellarMap> {
        let vessels = self.liquid_map().await?;
        Ok(CellarMap {
            summary: CellarSummary::from_map(&vessels),
            vessels: vessels.into_iter().map(CellarEntry::from).collect(),
        })
    }

    /// One map entry, or not found
    pub async fn liquid(&self, vessel_id: Uuid) -> AppResult<VesselLiquid> {
        self.liquid_map()
            .await?
            .into_iter()
            .find(|v| v.vessel.id == vessel_id)
            .ok_or_else(|| AppError::NotFound(format!("Vessel {}", vessel_id)))
    }

    pub async fn create(&self, input: VesselInput) -> AppResult<Vessel> {
        input.validate()?;
        let input = input.normalized();
        let vessel: Vessel = self
            .rpc
            .mutate("vessel.create", &input, VESSEL_GROUPS)
            .await
            .map_err(|e| e.titled("Create failed"))?;
        tracing::info!(vessel_id = %vessel.id, name = %vessel.name, "Vessel created");
        Ok(vessel)
    }

    pub async fn update(&self, id: Uuid, input: VesselInput) -> AppResult<Vessel> {
        input.validate()?;
        let input = input.normalized();
        self.rpc
            .mutate(
                "vessel.update",
                &json!({ "id": id, "data": input }),
                VESSEL_GROUPS,
            )
            .await
            .map_err(|e| e.titled("Update failed"))
    }

    pub async fn update_status(&self, id: Uuid, status: VesselStatus) -> AppResult<Vessel> {
        let input = UpdateVesselStatusInput { id, status };
        let vessel: Vessel = self
            .rpc
            .mutate("vessel.updateStatus", &input, VESSEL_GROUPS)
            .await
            .map_err(|e| e.titled("Status update failed"))?;
        tracing::info!(vessel_id = %id, ?status, "Vessel status changed");
        Ok(vessel)
    }

    pub async fn barrel_origin_types(&self) -> AppResult<Vec<BarrelOriginType>> {
        self.rpc.query("barrelOriginTypes.list", &json!({})).await
    }
}
