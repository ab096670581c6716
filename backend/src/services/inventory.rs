//! Inventory service: stock on hand and per-material receipt forms

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use shared::{
    InventoryItem, InventoryTransaction, InventoryTransactionInput, MaterialForm, MaterialType,
    NormalizeError,
};

use crate::error::{AppError, AppResult};
use crate::external::RpcClient;

const INVENTORY_GROUPS: &[&str] = &["inventory."];

/// Inventory table filters
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryListQuery {
    pub material_type: Option<MaterialType>,
    pub search: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u64>,
}

#[derive(Clone)]
pub struct InventoryService {
    rpc: Arc<RpcClient>,
}

impl InventoryService {
    pub fn new(rpc: Arc<RpcClient>) -> Self {
        Self { rpc }
    }

    pub async fn list(&self, query: &InventoryListQuery) -> AppResult<Vec<InventoryItem>> {
        self.rpc.query("inventory.list", query).await
    }

    pub async fn list_transactions(
        &self,
        material_type: Option<MaterialType>,
    ) -> AppResult<Vec<InventoryTransaction>> {
        self.rpc
            .query(
                "inventory.listTransactions",
                &json!({ "materialType": material_type }),
            )
            .await
    }

    /// Validate a material form, convert it to the canonical unit and record
    /// it as one inventory transaction.
    pub async fn record(&self, form: MaterialForm) -> AppResult<InventoryTransaction> {
        form.validate()?;
        let input: InventoryTransactionInput = form.normalize().map_err(|e| match e {
            NormalizeError::OutOfRange { field } => AppError::Validation {
                field: field.to_string(),
                message: e.to_string(),
            },
        })?;
        let transaction: InventoryTransaction = self
            .rpc
            .mutate("inventory.createTransaction", &input, INVENTORY_GROUPS)
            .await
            .map_err(|e| e.titled("Save failed"))?;
        tracing::info!(
            material = %input.material_type,
            quantity = %input.quantity,
            unit = %input.unit,
            "Inventory transaction recorded"
        );
        Ok(transaction)
    }
}
