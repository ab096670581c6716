//! Batch models and reconciliation status transitions

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A production batch sitting in (or moved through) vessels
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    pub id: Uuid,
    pub name: String,
    pub batch_number: Option<String>,
    pub vessel_id: Option<Uuid>,
    pub vessel_name: Option<String>,
    pub product_type: ProductType,
    pub stage: BatchStage,
    pub start_date: NaiveDate,
    pub initial_volume_liters: Decimal,
    pub current_volume_liters: Decimal,
    pub ending_volume_liters: Option<Decimal>,
    pub reconciliation_status: ReconciliationStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    Cider,
    Perry,
    Wine,
    Pommeau,
    Brandy,
    Juice,
    Other,
}

impl ProductType {
    /// Column label; the table sorts on this
    pub fn label(&self) -> &'static str {
        match self {
            ProductType::Cider => "Cider",
            ProductType::Perry => "Perry",
            ProductType::Wine => "Wine",
            ProductType::Pommeau => "Pommeau",
            ProductType::Brandy => "Brandy",
            ProductType::Juice => "Juice",
            ProductType::Other => "Other",
        }
    }
}

impl std::fmt::Display for ProductType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BatchStage {
    Fermentation,
    Aging,
    Packaged,
    Completed,
}

/// Whether a batch is counted in TTB reconciliation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReconciliationStatus {
    #[default]
    Pending,
    Verified,
    Duplicate,
    Excluded,
}

impl std::fmt::Display for ReconciliationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReconciliationStatus::Pending => write!(f, "pending"),
            ReconciliationStatus::Verified => write!(f, "verified"),
            ReconciliationStatus::Duplicate => write!(f, "duplicate"),
            ReconciliationStatus::Excluded => write!(f, "excluded"),
        }
    }
}

/// User actions on a batch's reconciliation status. Each maps to exactly
/// one RPC mutation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BatchAction {
    Verify,
    ForceVerify,
    ResetToPending,
    Exclude,
}

impl BatchAction {
    pub fn procedure(&self) -> &'static str {
        match self {
            BatchAction::Verify => "batch.verifyForReconciliation",
            BatchAction::ForceVerify => "batch.forceVerifyForReconciliation",
            BatchAction::ResetToPending => "batch.resetReconciliationStatus",
            BatchAction::Exclude => "batch.excludeFromReconciliation",
        }
    }

    /// Title shown to the user when the mutation fails
    pub fn failure_title(&self) -> &'static str {
        match self {
            BatchAction::Verify | BatchAction::ForceVerify => "Verification failed",
            BatchAction::ResetToPending => "Reset failed",
            BatchAction::Exclude => "Exclude failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot {action:?} a batch that is {from}")]
pub struct InvalidTransition {
    pub from: ReconciliationStatus,
    pub action: BatchAction,
}

impl ReconciliationStatus {
    /// Apply a user action, rejecting transitions that make no sense
    pub fn apply(self, action: BatchAction) -> Result<Self, InvalidTransition> {
        use ReconciliationStatus as S;
        let next = match (self, action) {
            (S::Pending, BatchAction::Verify) => S::Verified,
            (S::Pending | S::Duplicate, BatchAction::ForceVerify) => S::Verified,
            (S::Verified | S::Duplicate | S::Excluded, BatchAction::ResetToPending) => S::Pending,
            (S::Pending | S::Duplicate | S::Verified, BatchAction::Exclude) => S::Excluded,
            (from, action) => return Err(InvalidTransition { from, action }),
        };
        Ok(next)
    }
}

/// Outcome of the per-batch validation rules run by the backend
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Pass,
    Warning,
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchValidation {
    pub status: ValidationStatus,
    #[serde(default)]
    pub messages: Vec<String>,
}

/// A batch as listed on the reconciliation page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchWithValidation {
    #[serde(flatten)]
    pub batch: Batch,
    pub validation: BatchValidation,
    #[serde(default)]
    pub verified_for_year: bool,
}

/// Input for a bulk verify of several batches in one period
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BulkVerifyInput {
    pub batch_ids: Vec<Uuid>,
    pub year: i32,
}
