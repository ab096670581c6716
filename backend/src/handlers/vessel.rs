//! HTTP handlers for vessels, the cellar map and barrel origin types

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use shared::{BarrelOriginType, Vessel, VesselInput, VesselLiquid, VesselStatus};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::vessel::{CellarMap, VesselService};
use crate::AppState;

pub async fn list_vessels(State(state): State<AppState>) -> AppResult<Json<Vec<Vessel>>> {
    let service = VesselService::new(state.rpc);
    Ok(Json(service.list().await?))
}

/// Every vessel with its current contents and status counts
pub async fn get_cellar_map(State(state): State<AppState>) -> AppResult<Json<CellarMap>> {
    let service = VesselService::new(state.rpc);
    Ok(Json(service.cellar_map().await?))
}

pub async fn get_vessel(
    State(state): State<AppState>,
    Path(vessel_id): Path<Uuid>,
) -> AppResult<Json<VesselLiquid>> {
    let service = VesselService::new(state.rpc);
    Ok(Json(service.liquid(vessel_id).await?))
}

pub async fn create_vessel(
    State(state): State<AppState>,
    Json(input): Json<VesselInput>,
) -> AppResult<(StatusCode, Json<Vessel>)> {
    let service = VesselService::new(state.rpc);
    let vessel = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(vessel)))
}

pub async fn update_vessel(
    State(state): State<AppState>,
    Path(vessel_id): Path<Uuid>,
    Json(input): Json<VesselInput>,
) -> AppResult<Json<Vessel>> {
    let service = VesselService::new(state.rpc);
    Ok(Json(service.update(vessel_id, input).await?))
}

#[derive(Debug, Deserialize)]
pub struct VesselStatusRequest {
    pub status: VesselStatus,
}

pub async fn update_vessel_status(
    State(state): State<AppState>,
    Path(vessel_id): Path<Uuid>,
    Json(request): Json<VesselStatusRequest>,
) -> AppResult<Json<Vessel>> {
    let service = VesselService::new(state.rpc);
    Ok(Json(service.update_status(vessel_id, request.status).await?))
}

pub async fn list_barrel_origin_types(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<BarrelOriginType>>> {
    let service = VesselService::new(state.rpc);
    Ok(Json(service.barrel_origin_types().await?))
}
