//! Purchasing models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::Vendor;

/// A purchase from a vendor with its line items
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub vendor_name: Option<String>,
    pub purchase_date: NaiveDate,
    pub notes: Option<String>,
    pub lines: Vec<PurchaseLine>,
    pub created_at: DateTime<Utc>,
}

impl Purchase {
    pub fn total_cost(&self) -> Decimal {
        self.lines.iter().map(PurchaseLine::line_total).sum()
    }
}

/// A single purchased item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseLine {
    pub id: Uuid,
    /// Variety for fruit, item name for supplies
    pub item_name: String,
    pub quantity: Decimal,
    pub unit: String,
    pub unit_price: Decimal,
    pub harvest_date: Option<NaiveDate>,
}

impl PurchaseLine {
    pub fn line_total(&self) -> Decimal {
        self.quantity * self.unit_price
    }
}

/// Input for creating a purchase
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "crate::validation::validate_purchase_has_lines"))]
pub struct CreatePurchaseInput {
    pub vendor_id: Uuid,
    pub purchase_date: NaiveDate,
    pub notes: Option<String>,
    #[validate]
    pub lines: Vec<PurchaseLineInput>,
}

/// Input for one purchase line
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseLineInput {
    #[validate(length(min = 1, message = "Item name is required"))]
    pub item_name: String,
    #[validate(custom = "crate::validation::validate_positive")]
    pub quantity: Decimal,
    #[validate(length(min = 1, message = "Unit is required"))]
    pub unit: String,
    #[validate(custom = "crate::validation::validate_positive")]
    pub unit_price: Decimal,
    pub harvest_date: Option<NaiveDate>,
}

/// Header-only edit of an existing purchase. Lines are not editable once
/// recorded; delete and re-enter instead.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePurchaseInput {
    #[serde(skip_deserializing)]
    pub id: Uuid,
    pub vendor_id: Option<Uuid>,
    pub purchase_date: Option<NaiveDate>,
    #[validate(length(max = 2000, message = "Notes are too long"))]
    pub notes: Option<String>,
}

/// Printable receipt for a purchase
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseReceipt {
    pub purchase_id: Uuid,
    pub purchase_date: NaiveDate,
    pub vendor_name: String,
    pub vendor_contact: Option<String>,
    pub lines: Vec<ReceiptLine>,
    pub total: Decimal,
    pub notes: Option<String>,
}

/// One receipt row with display-rounded money values
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLine {
    pub item_name: String,
    pub quantity: String,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    pub harvest_date: Option<NaiveDate>,
}

impl PurchaseReceipt {
    /// Build the receipt. Totals are computed from unrounded values and only
    /// rounded to cents at the end.
    pub fn build(purchase: &Purchase, vendor: &Vendor) -> Self {
        let lines = purchase
            .lines
            .iter()
            .map(|line| ReceiptLine {
                item_name: line.item_name.clone(),
                quantity: format!("{} {}", line.quantity.normalize(), line.unit),
                unit_price: line.unit_price.round_dp(2),
                line_total: line.line_total().round_dp(2),
                harvest_date: line.harvest_date,
            })
            .collect();

        Self {
            purchase_id: purchase.id,
            purchase_date: purchase.purchase_date,
            vendor_name: vendor.name.clone(),
            vendor_contact: vendor.contact_name.clone().or_else(|| vendor.email.clone()),
            lines,
            total: purchase.total_cost().round_dp(2),
            notes: purchase.notes.clone(),
        }
    }
}
