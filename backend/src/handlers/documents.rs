//! TTB form preview and PDF report downloads

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::Utc;

use crate::error::AppResult;
use crate::services::documents::{DocumentService, TtbFormPreview};
use crate::services::reconciliation::ReconciliationQuery;
use crate::AppState;

/// TTB Form 5120.17 figures for the period, rounded for print
pub async fn get_ttb_preview(
    State(state): State<AppState>,
    Query(query): Query<ReconciliationQuery>,
) -> AppResult<Json<TtbFormPreview>> {
    let view = query.into_view(Utc::now().date_naive())?;
    let service = DocumentService::new(state.rpc);
    Ok(Json(service.ttb_preview(&view.period).await?))
}

pub async fn download_ttb_pdf(
    State(state): State<AppState>,
    Query(query): Query<ReconciliationQuery>,
) -> AppResult<impl IntoResponse> {
    let view = query.into_view(Utc::now().date_naive())?;
    let service = DocumentService::new(state.rpc);
    let document = service.ttb_form_pdf(&view.period).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, document.content_disposition()),
        ],
        document.bytes,
    ))
}
