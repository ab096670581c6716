//! Reconciliation page handlers: the filtered table, CSV export and batch
//! status actions

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use shared::export::{export_filename, reconciliation_csv};
use shared::{BatchAction, BulkVerifyInput, ReconciliationStatus};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::reconciliation::{
    ReconciliationPage, ReconciliationQuery, ReconciliationService,
};
use crate::AppState;

fn service(state: &AppState) -> ReconciliationService {
    ReconciliationService::new(
        state.rpc.clone(),
        state.auto_verify.clone(),
        state.config.reconciliation.auto_verify_enabled,
    )
}

/// Reconciliation table for a period with filters and sort applied
pub async fn get_reconciliation(
    State(state): State<AppState>,
    Query(query): Query<ReconciliationQuery>,
) -> AppResult<Json<ReconciliationPage>> {
    let view = query.into_view(Utc::now().date_naive())?;
    let page = service(&state).page(view).await?;
    Ok(Json(page))
}

/// Download the rows currently shown as CSV
pub async fn export_reconciliation_csv(
    State(state): State<AppState>,
    Query(query): Query<ReconciliationQuery>,
) -> AppResult<impl IntoResponse> {
    let today = Utc::now().date_naive();
    let view = query.into_view(today)?;
    let rows = service(&state).rows(&view).await?;
    let csv = reconciliation_csv(&rows)?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_filename("reconciliation", today)
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}

#[derive(Debug, Deserialize)]
pub struct BatchActionRequest {
    pub action: BatchAction,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchActionResponse {
    pub batch_id: Uuid,
    pub reconciliation_status: ReconciliationStatus,
}

/// Verify, force-verify, reset or exclude one batch
pub async fn apply_batch_action(
    State(state): State<AppState>,
    Path(batch_id): Path<Uuid>,
    Json(request): Json<BatchActionRequest>,
) -> AppResult<Json<BatchActionResponse>> {
    let status = service(&state).apply_action(batch_id, request.action).await?;
    Ok(Json(BatchActionResponse {
        batch_id,
        reconciliation_status: status,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkVerifyResponse {
    pub verified: usize,
}

pub async fn bulk_verify(
    State(state): State<AppState>,
    Json(input): Json<BulkVerifyInput>,
) -> AppResult<Json<BulkVerifyResponse>> {
    let verified = input.batch_ids.len();
    service(&state).bulk_verify(input).await?;
    Ok(Json(BulkVerifyResponse { verified }))
}
