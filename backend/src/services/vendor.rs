//! Vendor service: vendors and the varieties they supply

use std::sync::Arc;

use serde_json::json;
use shared::{
    CreateVendorInput, CreateVendorVarietyInput, UpdateVendorInput, Vendor, VendorVariety,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppResult;
use crate::external::RpcClient;

const VENDOR_GROUPS: &[&str] = &["vendor.", "purchase."];
const VARIETY_GROUPS: &[&str] = &["vendorVariety."];

#[derive(Clone)]
pub struct VendorService {
    rpc: Arc<RpcClient>,
}

impl VendorService {
    pub fn new(rpc: Arc<RpcClient>) -> Self {
        Self { rpc }
    }

    pub async fn list(&self, include_inactive: bool) -> AppResult<Vec<Vendor>> {
        self.rpc
            .query("vendor.list", &json!({ "includeInactive": include_inactive }))
            .await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Vendor> {
        self.rpc.query("vendor.getById", &json!({ "id": id })).await
    }

    pub async fn create(&self, input: CreateVendorInput) -> AppResult<Vendor> {
        input.validate()?;
        let vendor: Vendor = self
            .rpc
            .mutate("vendor.create", &input, VENDOR_GROUPS)
            .await
            .map_err(|e| e.titled("Create failed"))?;
        tracing::info!(vendor_id = %vendor.id, "Vendor created");
        Ok(vendor)
    }

    pub async fn update(&self, id: Uuid, mut input: UpdateVendorInput) -> AppResult<Vendor> {
        input.validate()?;
        input.id = id;
        self.rpc
            .mutate("vendor.update", &input, VENDOR_GROUPS)
            .await
            .map_err(|e| e.titled("Update failed"))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let _: serde_json::Value = self
            .rpc
            .mutate("vendor.delete", &json!({ "id": id }), VENDOR_GROUPS)
            .await
            .map_err(|e| e.titled("Delete Failed"))?;
        tracing::info!(vendor_id = %id, "Vendor deleted");
        Ok(())
    }

    pub async fn list_varieties(&self, vendor_id: Uuid) -> AppResult<Vec<VendorVariety>> {
        self.rpc
            .query("vendorVariety.listByVendor", &json!({ "vendorId": vendor_id }))
            .await
    }

    pub async fn add_variety(
        &self,
        vendor_id: Uuid,
        mut input: CreateVendorVarietyInput,
    ) -> AppResult<VendorVariety> {
        input.vendor_id = vendor_id;
        input.validate()?;
        self.rpc
            .mutate("vendorVariety.create", &input, VARIETY_GROUPS)
            .await
            .map_err(|e| e.titled("Add variety failed"))
    }

    pub async fn remove_variety(&self, variety_id: Uuid) -> AppResult<()> {
        let _: serde_json::Value = self
            .rpc
            .mutate("vendorVariety.delete", &json!({ "id": variety_id }), VARIETY_GROUPS)
            .await
            .map_err(|e| e.titled("Delete Failed"))?;
        Ok(())
    }
}
