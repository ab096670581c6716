//! HTTP handlers for vessel-to-vessel transfers and blend confirmation

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shared::transfer::{TransferCheck, TransferRequest};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::transfer::{TransferOutcome, TransferService};
use crate::AppState;

fn service(state: AppState) -> TransferService {
    TransferService::new(state.rpc, state.pending_blends)
}

/// Run the transfer checks without moving anything
pub async fn check_transfer(
    State(state): State<AppState>,
    Json(request): Json<TransferRequest>,
) -> AppResult<Json<TransferCheck>> {
    Ok(Json(service(state).check(&request).await?))
}

/// Submit a transfer. Blends come back as `confirmation_required`.
pub async fn submit_transfer(
    State(state): State<AppState>,
    Json(request): Json<TransferRequest>,
) -> AppResult<Json<TransferOutcome>> {
    Ok(Json(service(state).submit(request).await?))
}

pub async fn confirm_blend(
    State(state): State<AppState>,
    Path(token): Path<Uuid>,
) -> AppResult<Json<TransferOutcome>> {
    Ok(Json(service(state).confirm(token).await?))
}

pub async fn cancel_blend(
    State(state): State<AppState>,
    Path(token): Path<Uuid>,
) -> AppResult<StatusCode> {
    service(state).cancel(token).await?;
    Ok(StatusCode::NO_CONTENT)
}
