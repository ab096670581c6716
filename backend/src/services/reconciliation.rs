//! TTB reconciliation service
//!
//! Loads the batches and backend reconciliation summary for a period, runs
//! them through the shared filter/sort pipeline, applies batch status
//! actions and fires auto-verification when the period reconciles cleanly.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use shared::reconciliation::{
    status_counts, AutoVerifyDecision, AutoVerifyTracker, CheckIndicator, ReconciliationRow,
    ReconciliationView, SkipReason, SortField, StatusFilter, TtbIssue, ViewAction,
    WaterfallBreakdown,
};
use shared::{
    default_reporting_year, Batch, BatchAction, BatchWithValidation, BulkVerifyInput, DateRange,
    PeriodKind, ReconciliationStatus, ReconciliationSummary, ReportingPeriod, SortDirection,
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::external::RpcClient;

const BATCH_GROUPS: &[&str] = &["batch.", "ttb."];

/// Query parameters of the reconciliation page
#[derive(Debug, Default, Deserialize)]
pub struct ReconciliationQuery {
    pub year: Option<i32>,
    pub period: Option<String>,
    pub status: Option<StatusFilter>,
    pub issue: Option<TtbIssue>,
    pub sort: Option<SortField>,
    pub dir: Option<SortDirection>,
    /// Comma-separated batch ids
    pub expanded: Option<String>,
}

impl ReconciliationQuery {
    /// Rebuild view state by replaying the equivalent user actions
    pub fn into_view(self, today: NaiveDate) -> AppResult<ReconciliationView> {
        let period = ReportingPeriod {
            year: self.year.unwrap_or_else(|| default_reporting_year(today)),
            period: PeriodKind::parse_token(self.period.as_deref().unwrap_or(""))
                .map_err(|m| AppError::Validation {
                    field: "period".to_string(),
                    message: m.to_string(),
                })?,
        };

        let mut view = ReconciliationView::new(period);
        if let Some(status) = self.status {
            view.dispatch(ViewAction::ToggleStatus(status));
        }
        view.dispatch(ViewAction::SelectIssue(self.issue));
        if let Some(field) = self.sort {
            view.dispatch(ViewAction::SortBy(field));
            if self.dir == Some(SortDirection::Desc) {
                view.dispatch(ViewAction::SortBy(field));
            }
        }
        for id in self.expanded.as_deref().unwrap_or("").split(',') {
            if id.trim().is_empty() {
                continue;
            }
            let id = Uuid::parse_str(id.trim()).map_err(|_| AppError::Validation {
                field: "expanded".to_string(),
                message: format!("Invalid batch id: {}", id),
            })?;
            view.dispatch(ViewAction::ToggleExpanded(id));
        }
        Ok(view)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AutoVerifyReport {
    Disabled,
    Skipped { reason: SkipReason },
    Verified { count: usize },
    Failed { message: String },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub filter: StatusFilter,
    pub count: usize,
}

/// Everything the reconciliation page renders
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationPage {
    pub view: ReconciliationView,
    pub query_string: String,
    pub totals: WaterfallBreakdown,
    pub aggregate_identity: CheckIndicator,
    pub is_finalized: bool,
    pub status_counts: Vec<StatusCount>,
    pub rows: Vec<ReconciliationRow>,
    pub auto_verify: AutoVerifyReport,
}

#[derive(Clone)]
pub struct ReconciliationService {
    rpc: Arc<RpcClient>,
    tracker: Arc<Mutex<AutoVerifyTracker>>,
    auto_verify_enabled: bool,
}

fn period_range(period: &ReportingPeriod) -> AppResult<DateRange> {
    period.date_range().ok_or_else(|| AppError::Validation {
        field: "year".to_string(),
        message: "Invalid reporting period".to_string(),
    })
}

impl ReconciliationService {
    pub fn new(
        rpc: Arc<RpcClient>,
        tracker: Arc<Mutex<AutoVerifyTracker>>,
        auto_verify_enabled: bool,
    ) -> Self {
        Self {
            rpc,
            tracker,
            auto_verify_enabled,
        }
    }

    /// Batches and backend summary for a period
    pub async fn load(
        &self,
        period: &ReportingPeriod,
    ) -> AppResult<(Vec<BatchWithValidation>, ReconciliationSummary)> {
        tokio::try_join!(
            self.rpc.query("batch.listForReconciliation", period),
            self.rpc.query("ttb.getReconciliationSummary", period),
        )
    }

    pub async fn page(&self, view: ReconciliationView) -> AppResult<ReconciliationPage> {
        let range = period_range(&view.period)?;
        let (mut batches, mut summary) = self.load(&view.period).await?;

        let auto_verify = self.auto_verify(range, &view.period, &batches, &summary).await;
        if matches!(auto_verify, AutoVerifyReport::Verified { .. }) {
            (batches, summary) = self.load(&view.period).await?;
        }

        let status_counts = status_counts(&batches, range)
            .into_iter()
            .map(|(filter, count)| StatusCount { filter, count })
            .collect();

        Ok(ReconciliationPage {
            query_string: view.query_string(),
            totals: WaterfallBreakdown::from_waterfall(summary.totals),
            aggregate_identity: CheckIndicator::identity(summary.identity_check),
            is_finalized: summary.is_finalized,
            status_counts,
            rows: view.rows(&batches, &summary),
            auto_verify,
            view,
        })
    }

    /// Filtered and sorted rows only, for export
    pub async fn rows(&self, view: &ReconciliationView) -> AppResult<Vec<ReconciliationRow>> {
        period_range(&view.period)?;
        let (batches, summary) = self.load(&view.period).await?;
        Ok(view.rows(&batches, &summary))
    }

    async fn auto_verify(
        &self,
        range: DateRange,
        period: &ReportingPeriod,
        batches: &[BatchWithValidation],
        summary: &ReconciliationSummary,
    ) -> AutoVerifyReport {
        if !self.auto_verify_enabled {
            return AutoVerifyReport::Disabled;
        }

        let decision = self.tracker.lock().await.evaluate(range, batches, summary);
        let (key, batch_ids) = match decision {
            AutoVerifyDecision::Skip(reason) => {
                tracing::debug!(?reason, "Auto-verify skipped");
                return AutoVerifyReport::Skipped { reason };
            }
            AutoVerifyDecision::Fire { key, batch_ids } => (key, batch_ids),
        };

        let count = batch_ids.len();
        tracing::info!(%key, count, "Auto-verifying clean batches");
        let input = BulkVerifyInput {
            batch_ids,
            year: period.year,
        };
        match self.bulk_verify(input).await {
            Ok(()) => AutoVerifyReport::Verified { count },
            Err(e) => {
                tracing::warn!(%key, "Auto-verify failed: {}", e);
                AutoVerifyReport::Failed {
                    message: e.to_string(),
                }
            }
        }
    }

    pub async fn bulk_verify(&self, input: BulkVerifyInput) -> AppResult<()> {
        if input.batch_ids.is_empty() {
            return Err(AppError::Validation {
                field: "batchIds".to_string(),
                message: "Select at least one batch".to_string(),
            });
        }
        let _: serde_json::Value = self
            .rpc
            .mutate("batch.bulkVerifyForReconciliation", &input, BATCH_GROUPS)
            .await
            .map_err(|e| e.titled("Verification failed"))?;
        Ok(())
    }

    /// Apply a status action to one batch. Transitions that make no sense
    /// for the batch's current status are refused before any mutation.
    pub async fn apply_action(
        &self,
        batch_id: Uuid,
        action: BatchAction,
    ) -> AppResult<ReconciliationStatus> {
        let batch: Batch = self
            .rpc
            .query("batch.getById", &json!({ "id": batch_id }))
            .await?;

        let next = batch.reconciliation_status.apply(action).map_err(|e| {
            AppError::InvalidStateTransition(e.to_string()).titled(action.failure_title())
        })?;

        let _: serde_json::Value = self
            .rpc
            .mutate(action.procedure(), &json!({ "id": batch_id }), BATCH_GROUPS)
            .await
            .map_err(|e| e.titled(action.failure_title()))?;

        tracing::info!(
            %batch_id,
            from = %batch.reconciliation_status,
            to = %next,
            "Batch reconciliation status changed"
        );
        Ok(next)
    }
}
