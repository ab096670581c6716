//! State container for the reconciliation table
//!
//! All view state (period, filter chips, sort, expanded rows) lives in one
//! value and only changes through [`ReconciliationView::dispatch`].
//! Rendering is the pure [`ReconciliationView::rows`] step.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    apply_pipeline, check_indicators, index_by_batch, BatchIssues, CheckIndicator, FilterState,
    SortField, SortState, StatusFilter, TtbIssue, WaterfallBreakdown,
};
use crate::models::{BatchReconciliation, BatchWithValidation, ReconciliationSummary};
use crate::types::ReportingPeriod;

/// Discrete user actions on the reconciliation table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ViewAction {
    SetPeriod(ReportingPeriod),
    ToggleStatus(StatusFilter),
    /// `None` selects "all"
    SelectIssue(Option<TtbIssue>),
    SortBy(SortField),
    ToggleExpanded(Uuid),
    ClearFilters,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationView {
    pub period: ReportingPeriod,
    pub filters: FilterState,
    pub sort: Option<SortState>,
    #[serde(default)]
    pub expanded: HashSet<Uuid>,
}

/// One rendered table row
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationRow {
    pub batch: BatchWithValidation,
    pub reconciliation: Option<BatchReconciliation>,
    pub issues: BatchIssues,
    pub indicators: Vec<CheckIndicator>,
    pub breakdown: Option<WaterfallBreakdown>,
    pub expanded: bool,
}

impl ReconciliationView {
    pub fn new(period: ReportingPeriod) -> Self {
        Self {
            period,
            filters: FilterState::default(),
            sort: None,
            expanded: HashSet::new(),
        }
    }

    pub fn dispatch(&mut self, action: ViewAction) {
        match action {
            ViewAction::SetPeriod(period) => {
                if period != self.period {
                    self.period = period;
                    self.expanded.clear();
                }
            }
            ViewAction::ToggleStatus(filter) => self.filters.toggle_status(filter),
            ViewAction::SelectIssue(issue) => self.filters.select_issue(issue),
            ViewAction::SortBy(field) => self.sort = Some(SortState::toggle(self.sort, field)),
            ViewAction::ToggleExpanded(id) => {
                if !self.expanded.remove(&id) {
                    self.expanded.insert(id);
                }
            }
            ViewAction::ClearFilters => self.filters.clear(),
        }
    }

    /// Filtered, sorted rows for the current state. A period without a
    /// valid calendar range renders nothing.
    pub fn rows(
        &self,
        batches: &[BatchWithValidation],
        summary: &ReconciliationSummary,
    ) -> Vec<ReconciliationRow> {
        let Some(range) = self.period.date_range() else {
            return Vec::new();
        };
        let map = index_by_batch(summary);

        apply_pipeline(batches, &map, &self.filters, self.sort, range)
            .into_iter()
            .map(|b| {
                let rec = map.get(&b.batch.id).cloned();
                ReconciliationRow {
                    issues: rec
                        .as_ref()
                        .map(BatchIssues::from_reconciliation)
                        .unwrap_or_default(),
                    indicators: rec
                        .as_ref()
                        .map(|r| check_indicators(r).to_vec())
                        .unwrap_or_default(),
                    breakdown: rec.as_ref().map(|r| WaterfallBreakdown::from_waterfall(r.waterfall)),
                    expanded: self.expanded.contains(&b.batch.id),
                    reconciliation: rec,
                    batch: b.clone(),
                }
            })
            .collect()
    }

    /// Query string that restores the period on reload
    pub fn query_string(&self) -> String {
        self.period.to_query_string()
    }
}
