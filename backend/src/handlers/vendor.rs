//! HTTP handlers for vendors and their varieties

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use shared::{CreateVendorInput, CreateVendorVarietyInput, UpdateVendorInput, Vendor, VendorVariety};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::VendorService;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorListQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

pub async fn list_vendors(
    State(state): State<AppState>,
    Query(query): Query<VendorListQuery>,
) -> AppResult<Json<Vec<Vendor>>> {
    let service = VendorService::new(state.rpc);
    Ok(Json(service.list(query.include_inactive).await?))
}

pub async fn get_vendor(
    State(state): State<AppState>,
    Path(vendor_id): Path<Uuid>,
) -> AppResult<Json<Vendor>> {
    let service = VendorService::new(state.rpc);
    Ok(Json(service.get(vendor_id).await?))
}

pub async fn create_vendor(
    State(state): State<AppState>,
    Json(input): Json<CreateVendorInput>,
) -> AppResult<(StatusCode, Json<Vendor>)> {
    let service = VendorService::new(state.rpc);
    let vendor = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(vendor)))
}

pub async fn update_vendor(
    State(state): State<AppState>,
    Path(vendor_id): Path<Uuid>,
    Json(input): Json<UpdateVendorInput>,
) -> AppResult<Json<Vendor>> {
    let service = VendorService::new(state.rpc);
    Ok(Json(service.update(vendor_id, input).await?))
}

pub async fn delete_vendor(
    State(state): State<AppState>,
    Path(vendor_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = VendorService::new(state.rpc);
    service.delete(vendor_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_varieties(
    State(state): State<AppState>,
    Path(vendor_id): Path<Uuid>,
) -> AppResult<Json<Vec<VendorVariety>>> {
    let service = VendorService::new(state.rpc);
    Ok(Json(service.list_varieties(vendor_id).await?))
}

pub async fn add_variety(
    State(state): State<AppState>,
    Path(vendor_id): Path<Uuid>,
    Json(input): Json<CreateVendorVarietyInput>,
) -> AppResult<(StatusCode, Json<VendorVariety>)> {
    let service = VendorService::new(state.rpc);
    let variety = service.add_variety(vendor_id, input).await?;
    Ok((StatusCode::CREATED, Json(variety)))
}

pub async fn remove_variety(
    State(state): State<AppState>,
    Path((_vendor_id, variety_id)): Path<(Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    let service = VendorService::new(state.rpc);
    service.remove_variety(variety_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
