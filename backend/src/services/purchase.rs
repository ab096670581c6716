//! Purchase service: purchase history, entry, header edits and receipts

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use shared::{CreatePurchaseInput, Purchase, PurchaseReceipt, UpdatePurchaseInput, Vendor};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppResult;
use crate::external::RpcClient;

/// A new purchase also adds stock
const PURCHASE_GROUPS: &[&str] = &["purchase.", "inventory."];

/// Purchase history filters
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseListQuery {
    pub vendor_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub limit: Option<u32>,
    pub offset: Option<u64>,
}

#[derive(Clone)]
pub struct PurchaseService {
    rpc: Arc<RpcClient>,
}

impl PurchaseService {
    pub fn new(rpc: Arc<RpcClient>) -> Self {
        Self { rpc }
    }

    pub async fn list(&self, query: &PurchaseListQuery) -> AppResult<Vec<Purchase>> {
        self.rpc.query("purchase.list", query).await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Purchase> {
        self.rpc.query("purchase.getById", &json!({ "id": id })).await
    }

    pub async fn create(&self, input: CreatePurchaseInput) -> AppResult<Purchase> {
        input.validate()?;
        let purchase: Purchase = self
            .rpc
            .mutate("purchase.create", &input, PURCHASE_GROUPS)
            .await
            .map_err(|e| e.titled("Purchase failed"))?;
        tracing::info!(
            purchase_id = %purchase.id,
            lines = purchase.lines.len(),
            "Purchase recorded"
        );
        Ok(purchase)
    }

    /// Edit vendor, date or notes. Lines are never touched.
    pub async fn update_header(&self, id: Uuid, mut input: UpdatePurchaseInput) -> AppResult<Purchase> {
        input.validate()?;
        input.id = id;
        self.rpc
            .mutate("purchase.update", &input, PURCHASE_GROUPS)
            .await
            .map_err(|e| e.titled("Update failed"))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let _: serde_json::Value = self
            .rpc
            .mutate("purchase.delete", &json!({ "id": id }), PURCHASE_GROUPS)
            .await
            .map_err(|e| e.titled("Delete Failed"))?;
        tracing::info!(purchase_id = %id, "Purchase deleted");
        Ok(())
    }

    /// Printable receipt: the purchase joined with its vendor
    pub async fn receipt(&self, id: Uuid) -> AppResult<PurchaseReceipt> {
        let purchase = self.get(id).await?;
        let vendor: Vendor = self
            .rpc
            .query("vendor.getById", &json!({ "id": purchase.vendor_id }))
            .await?;
        Ok(PurchaseReceipt::build(&purchase, &vendor))
    }
}
