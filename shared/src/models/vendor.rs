//! Vendor models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A fruit or supply vendor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub id: Uuid,
    pub name: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// A variety (apple, pear, ...) a vendor is known to supply
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorVariety {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub variety_name: String,
    pub notes: Option<String>,
}

/// Input for creating a vendor
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVendorInput {
    #[validate(length(min = 1, max = 200, message = "Vendor name is required"))]
    pub name: String,
    pub contact_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(custom = "crate::validation::validate_phone_field")]
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Input for editing a vendor; absent fields are left unchanged
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVendorInput {
    #[serde(skip_deserializing)]
    pub id: Uuid,
    #[validate(length(min = 1, max = 200, message = "Vendor name cannot be empty"))]
    pub name: Option<String>,
    pub contact_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(custom = "crate::validation::validate_phone_field")]
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

/// Input for linking a variety to a vendor
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVendorVarietyInput {
    /// Taken from the route when omitted
    #[serde(default)]
    pub vendor_id: Uuid,
    #[validate(length(min = 1, message = "Variety name is required"))]
    pub variety_name: String,
    pub notes: Option<String>,
}

fn default_true() -> bool {
    true
}
