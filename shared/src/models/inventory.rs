//! Inventory models
//!
//! Each material type has its own entry form. Forms are normalized into a
//! single [`InventoryTransactionInput`] before they are submitted.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

use crate::units::{convert_weight, to_liters, VolumeUnit, WeightUnit};

/// Kinds of tracked material
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MaterialType {
    Apple,
    Juice,
    Additive,
    Packaging,
}

impl MaterialType {
    /// Unit every quantity of this material is stored in
    pub fn canonical_unit(&self) -> &'static str {
        match self {
            MaterialType::Apple => "kg",
            MaterialType::Juice => "L",
            MaterialType::Additive => "g",
            MaterialType::Packaging => "units",
        }
    }
}

impl std::fmt::Display for MaterialType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaterialType::Apple => write!(f, "Apple"),
            MaterialType::Juice => write!(f, "Juice"),
            MaterialType::Additive => write!(f, "Additive"),
            MaterialType::Packaging => write!(f, "Packaging"),
        }
    }
}

/// A recorded quantity change
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryTransaction {
    pub id: Uuid,
    pub material_type: MaterialType,
    pub item_name: String,
    pub quantity: Decimal,
    pub unit: String,
    pub vendor_id: Option<Uuid>,
    pub transaction_date: NaiveDate,
    pub notes: Option<String>,
    #[serde(default)]
    pub attributes: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Inventory list row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: Uuid,
    pub material_type: MaterialType,
    pub name: String,
    pub quantity_on_hand: Decimal,
    pub unit: String,
    pub location: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// The common transaction shape accepted by `inventory.createTransaction`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryTransactionInput {
    pub material_type: MaterialType,
    pub item_name: String,
    /// Quantity in the material's canonical unit
    pub quantity: Decimal,
    pub unit: String,
    pub vendor_id: Option<Uuid>,
    pub transaction_date: NaiveDate,
    pub notes: Option<String>,
    pub attributes: serde_json::Value,
}

/// Fruit received
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AppleForm {
    #[validate(length(min = 1, message = "Variety is required"))]
    pub variety: String,
    #[validate(custom = "crate::validation::validate_positive")]
    pub quantity: Decimal,
    pub unit: WeightUnit,
    pub vendor_id: Option<Uuid>,
    pub harvest_date: Option<NaiveDate>,
    pub received_date: NaiveDate,
    pub notes: Option<String>,
}

/// Juice bought in or pressed
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JuiceForm {
    #[validate(length(min = 1, message = "Juice name is required"))]
    pub name: String,
    #[validate(custom = "crate::validation::validate_positive")]
    pub volume: Decimal,
    pub unit: VolumeUnit,
    #[validate(custom = "crate::validation::validate_brix_field")]
    pub brix: Option<Decimal>,
    #[validate(custom = "crate::validation::validate_ph_field")]
    pub ph: Option<Decimal>,
    pub vendor_id: Option<Uuid>,
    pub received_date: NaiveDate,
    pub notes: Option<String>,
}

/// Yeast, nutrients, sulfites, enzymes, ...
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdditiveForm {
    #[validate(length(min = 1, message = "Additive name is required"))]
    pub name: String,
    pub additive_type: Option<String>,
    #[validate(custom = "crate::validation::validate_positive")]
    pub quantity: Decimal,
    pub unit: WeightUnit,
    pub lot_number: Option<String>,
    pub expiration_date: Option<NaiveDate>,
    pub vendor_id: Option<Uuid>,
    pub received_date: NaiveDate,
    pub notes: Option<String>,
}

/// Bottles, cans, caps, labels, kegs
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PackagingForm {
    #[validate(length(min = 1, message = "Item name is required"))]
    pub item_name: String,
    pub package_type: Option<String>,
    #[validate(range(min = 1, message = "Count must be at least 1"))]
    pub count: u32,
    pub vendor_id: Option<Uuid>,
    pub received_date: NaiveDate,
    pub notes: Option<String>,
}

/// One inventory entry form, tagged by material type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "materialType", rename_all = "snake_case")]
pub enum MaterialForm {
    Apple(AppleForm),
    Juice(JuiceForm),
    Additive(AdditiveForm),
    Packaging(PackagingForm),
}

impl MaterialForm {
    pub fn material_type(&self) -> MaterialType {
        match self {
            MaterialForm::Apple(_) => MaterialType::Apple,
            MaterialForm::Juice(_) => MaterialType::Juice,
            MaterialForm::Additive(_) => MaterialType::Additive,
            MaterialForm::Packaging(_) => MaterialType::Packaging,
        }
    }

    pub fn validate(&self) -> Result<(), validator::ValidationErrors> {
        match self {
            MaterialForm::Apple(form) => form.validate(),
            MaterialForm::Juice(form) => form.validate(),
            MaterialForm::Additive(form) => form.validate(),
            MaterialForm::Packaging(form) => form.validate(),
        }
    }

    /// Convert to the common transaction shape, moving quantities into the
    /// material's canonical unit.
    pub fn normalize(self) -> Result<InventoryTransactionInput, NormalizeError> {
        let material_type = self.material_type();
        let unit = material_type.canonical_unit().to_string();
        let out_of_range = |field| NormalizeError::OutOfRange { field };
        let input = match self {
            MaterialForm::Apple(form) => InventoryTransactionInput {
                material_type,
                item_name: form.variety,
                quantity: convert_weight(form.quantity, form.unit, WeightUnit::Kilograms)
                    .ok_or_else(|| out_of_range("quantity"))?,
                unit,
                vendor_id: form.vendor_id,
                transaction_date: form.received_date,
                notes: form.notes,
                attributes: serde_json::json!({
                    "harvestDate": form.harvest_date,
                    "enteredQuantity": form.quantity,
                    "enteredUnit": form.unit,
                }),
            },
            MaterialForm::Juice(form) => InventoryTransactionInput {
                material_type,
                item_name: form.name,
                quantity: to_liters(form.volume, form.unit).ok_or_else(|| out_of_range("volume"))?,
                unit,
                vendor_id: form.vendor_id,
                transaction_date: form.received_date,
                notes: form.notes,
                attributes: serde_json::json!({
                    "brix": form.brix,
                    "ph": form.ph,
                }),
            },
            MaterialForm::Additive(form) => InventoryTransactionInput {
                material_type,
                item_name: form.name,
                quantity: convert_weight(form.quantity, form.unit, WeightUnit::Grams)
                    .ok_or_else(|| out_of_range("quantity"))?,
                unit,
                vendor_id: form.vendor_id,
                transaction_date: form.received_date,
                notes: form.notes,
                attributes: serde_json::json!({
                    "additiveType": form.additive_type,
                    "lotNumber": form.lot_number,
                    "expirationDate": form.expiration_date,
                }),
            },
            MaterialForm::Packaging(form) => InventoryTransactionInput {
                material_type,
                item_name: form.item_name,
                quantity: Decimal::from(form.count),
                unit,
                vendor_id: form.vendor_id,
                transaction_date: form.received_date,
                notes: form.notes,
                attributes: serde_json::json!({
                    "packageType": form.package_type,
                }),
            },
        };
        Ok(input)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("{field} is too large to convert")]
    OutOfRange { field: &'static str },
}
