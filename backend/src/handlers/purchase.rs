//! HTTP handlers for purchases, receipts and purchase exports

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use shared::export::{export_filename, purchases_csv};
use shared::{CreatePurchaseInput, Purchase, PurchaseReceipt, UpdatePurchaseInput};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::purchase::{PurchaseListQuery, PurchaseService};
use crate::services::DocumentService;
use crate::AppState;

pub async fn list_purchases(
    State(state): State<AppState>,
    Query(query): Query<PurchaseListQuery>,
) -> AppResult<Json<Vec<Purchase>>> {
    let service = PurchaseService::new(state.rpc);
    Ok(Json(service.list(&query).await?))
}

pub async fn export_purchases_csv(
    State(state): State<AppState>,
    Query(query): Query<PurchaseListQuery>,
) -> AppResult<impl IntoResponse> {
    let service = PurchaseService::new(state.rpc);
    let purchases = service.list(&query).await?;
    let csv = purchases_csv(&purchases)?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_filename("purchases", Utc::now().date_naive())
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}

pub async fn get_purchase(
    State(state): State<AppState>,
    Path(purchase_id): Path<Uuid>,
) -> AppResult<Json<Purchase>> {
    let service = PurchaseService::new(state.rpc);
    Ok(Json(service.get(purchase_id).await?))
}

pub async fn create_purchase(
    State(state): State<AppState>,
    Json(input): Json<CreatePurchaseInput>,
) -> AppResult<(StatusCode, Json<Purchase>)> {
    let service = PurchaseService::new(state.rpc);
    let purchase = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(purchase)))
}

/// Edit the purchase header only
pub async fn update_purchase(
    State(state): State<AppState>,
    Path(purchase_id): Path<Uuid>,
    Json(input): Json<UpdatePurchaseInput>,
) -> AppResult<Json<Purchase>> {
    let service = PurchaseService::new(state.rpc);
    Ok(Json(service.update_header(purchase_id, input).await?))
}

pub async fn delete_purchase(
    State(state): State<AppState>,
    Path(purchase_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = PurchaseService::new(state.rpc);
    service.delete(purchase_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Printable receipt data
pub async fn get_purchase_receipt(
    State(state): State<AppState>,
    Path(purchase_id): Path<Uuid>,
) -> AppResult<Json<PurchaseReceipt>> {
    let service = PurchaseService::new(state.rpc);
    Ok(Json(service.receipt(purchase_id).await?))
}

pub async fn download_purchase_receipt_pdf(
    State(state): State<AppState>,
    Path(purchase_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let service = DocumentService::new(state.rpc);
    let document = service.purchase_receipt_pdf(purchase_id).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, document.content_disposition()),
        ],
        document.bytes,
    ))
}
