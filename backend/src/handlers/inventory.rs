//! HTTP handlers for inventory endpoints

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use shared::export::{export_filename, inventory_csv};
use shared::{InventoryItem, InventoryTransaction, MaterialForm, MaterialType};

use crate::error::AppResult;
use crate::services::inventory::{InventoryListQuery, InventoryService};
use crate::AppState;

pub async fn list_inventory(
    State(state): State<AppState>,
    Query(query): Query<InventoryListQuery>,
) -> AppResult<Json<Vec<InventoryItem>>> {
    let service = InventoryService::new(state.rpc);
    Ok(Json(service.list(&query).await?))
}

pub async fn export_inventory_csv(
    State(state): State<AppState>,
    Query(query): Query<InventoryListQuery>,
) -> AppResult<impl IntoResponse> {
    let service = InventoryService::new(state.rpc);
    let items = service.list(&query).await?;
    let csv = inventory_csv(&items)?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_filename("inventory", Utc::now().date_naive())
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionQuery {
    pub material_type: Option<MaterialType>,
}

pub async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<TransactionQuery>,
) -> AppResult<Json<Vec<InventoryTransaction>>> {
    let service = InventoryService::new(state.rpc);
    Ok(Json(service.list_transactions(query.material_type).await?))
}

/// Record a receipt from one of the per-material forms
pub async fn record_transaction(
    State(state): State<AppState>,
    Json(form): Json<MaterialForm>,
) -> AppResult<(StatusCode, Json<InventoryTransaction>)> {
    let service = InventoryService::new(state.rpc);
    let transaction = service.record(form).await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}
