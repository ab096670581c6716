//! HTTP handlers for packaging runs

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use shared::export::{export_filename, packaging_runs_csv};
use shared::PackagingRunQuery;

use crate::error::AppResult;
use crate::services::packaging::{PackagingRunList, PackagingService};
use crate::AppState;

pub async fn list_packaging_runs(
    State(state): State<AppState>,
    Query(query): Query<PackagingRunQuery>,
) -> AppResult<Json<PackagingRunList>> {
    let service = PackagingService::new(state.rpc);
    Ok(Json(service.list_with_totals(&query).await?))
}

pub async fn export_packaging_runs_csv(
    State(state): State<AppState>,
    Query(query): Query<PackagingRunQuery>,
) -> AppResult<impl IntoResponse> {
    let service = PackagingService::new(state.rpc);
    let runs = service.list_runs(&query).await?;
    let csv = packaging_runs_csv(&runs)?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_filename("packaging-runs", Utc::now().date_naive())
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}
