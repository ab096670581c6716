//! Validation utilities for the Cidery Management Platform
//!
//! Plain checks return `Result<(), &'static str>`. The `validate_*_field`
//! and schema functions adapt them to `validator` derives on form inputs.

use std::borrow::Cow;

use rust_decimal::Decimal;
use validator::ValidationError;

use crate::models::{CreatePurchaseInput, VesselInput, VesselMaterial};

// ============================================================================
// Quantity Validations
// ============================================================================

/// Validate that a quantity or price is strictly positive
pub fn validate_positive_amount(value: Decimal) -> Result<(), &'static str> {
    if value <= Decimal::ZERO {
        return Err("Value must be greater than zero");
    }
    Ok(())
}

/// Validate juice sugar reading (degrees Brix)
pub fn validate_brix(brix: Decimal) -> Result<(), &'static str> {
    if brix < Decimal::ZERO || brix > Decimal::from(40) {
        return Err("Brix must be between 0 and 40");
    }
    Ok(())
}

/// Validate a pH reading
pub fn validate_ph(ph: Decimal) -> Result<(), &'static str> {
    if ph < Decimal::ZERO || ph > Decimal::from(14) {
        return Err("pH must be between 0 and 14");
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate a North American phone number.
/// Accepts: 5551234567, (555) 123-4567, +1 555 123 4567
pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() == 10 {
        return Ok(());
    }
    if digits.len() == 11 && digits.starts_with('1') {
        return Ok(());
    }

    Err("Invalid phone number format")
}

/// Validate the year a barrel was acquired
pub fn validate_year_acquired(year: i32) -> Result<(), &'static str> {
    if !(1900..=2100).contains(&year) {
        return Err("Year acquired is out of range");
    }
    Ok(())
}

// ============================================================================
// Vessel Validations
// ============================================================================

/// Validate vessel attributes that depend on each other
pub fn validate_vessel_attributes(input: &VesselInput) -> Result<(), &'static str> {
    if let Some(working) = input.working_capacity {
        if working <= Decimal::ZERO {
            return Err("Working capacity must be greater than zero");
        }
        if working > input.capacity {
            return Err("Working capacity cannot exceed capacity");
        }
    }

    let is_steel = input.material == VesselMaterial::StainlessSteel;
    if (input.jacketed || input.is_pressure_vessel) && !is_steel {
        return Err("Jacketed and pressure vessels must be stainless steel");
    }

    if let Some(barrel) = &input.barrel {
        if !input.is_barrel_like() {
            return Err("Barrel details only apply to wood vessels or barrels");
        }
        if let Some(year) = barrel.year_acquired {
            validate_year_acquired(year)?;
        }
    }

    Ok(())
}

// ============================================================================
// `validator` adapters
// ============================================================================

fn to_validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

pub fn validate_positive(value: &Decimal) -> Result<(), ValidationError> {
    validate_positive_amount(*value).map_err(|m| to_validation_error("positive", m))
}

pub fn validate_brix_field(brix: &Decimal) -> Result<(), ValidationError> {
    validate_brix(*brix).map_err(|m| to_validation_error("brix", m))
}

pub fn validate_ph_field(ph: &Decimal) -> Result<(), ValidationError> {
    validate_ph(*ph).map_err(|m| to_validation_error("ph", m))
}

pub fn validate_phone_field(phone: &str) -> Result<(), ValidationError> {
    validate_phone(phone).map_err(|m| to_validation_error("phone", m))
}

pub fn validate_purchase_has_lines(input: &CreatePurchaseInput) -> Result<(), ValidationError> {
    if input.lines.is_empty() {
        return Err(to_validation_error(
            "lines",
            "At least one line item is required",
        ));
    }
    Ok(())
}

pub fn validate_vessel_input(input: &VesselInput) -> Result<(), ValidationError> {
    validate_vessel_attributes(input).map_err(|m| to_validation_error("vessel", m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BarrelAttributes, PurchaseLineInput};
    use crate::units::VolumeUnit;
    use chrono::NaiveDate;
    use std::str::FromStr;
    use uuid::Uuid;
    use validator::Validate;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn vessel(material: VesselMaterial) -> VesselInput {
        VesselInput {
            name: "Tank 1".to_string(),
            capacity: dec("1000"),
            capacity_unit: VolumeUnit::Liters,
            working_capacity: Some(dec("950")),
            material,
            jacketed: false,
            is_pressure_vessel: false,
            is_barrel: false,
            barrel: None,
            location: None,
        }
    }

    fn line(quantity: &str, price: &str) -> PurchaseLineInput {
        PurchaseLineInput {
            item_name: "Dabinett".to_string(),
            quantity: dec(quantity),
            unit: "bushel".to_string(),
            unit_price: dec(price),
            harvest_date: None,
        }
    }

    // ========================================================================
    // Quantity Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_positive_amount() {
        assert!(validate_positive_amount(dec("0.01")).is_ok());
        assert!(validate_positive_amount(dec("0")).is_err());
        assert!(validate_positive_amount(dec("-3")).is_err());
    }

    #[test]
    fn test_validate_brix_and_ph() {
        assert!(validate_brix(dec("12.5")).is_ok());
        assert!(validate_brix(dec("41")).is_err());
        assert!(validate_ph(dec("3.4")).is_ok());
        assert!(validate_ph(dec("15")).is_err());
        assert!(validate_ph(dec("-0.1")).is_err());
    }

    // ========================================================================
    // General Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("5551234567").is_ok());
        assert!(validate_phone("(555) 123-4567").is_ok());
        assert!(validate_phone("+1 555 123 4567").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("25551234567").is_err());
    }

    // ========================================================================
    // Vessel Validation Tests
    // ========================================================================

    #[test]
    fn test_steel_may_be_jacketed() {
        let mut input = vessel(VesselMaterial::StainlessSteel);
        input.jacketed = true;
        input.is_pressure_vessel = true;
        assert!(validate_vessel_attributes(&input).is_ok());
    }

    #[test]
    fn test_plastic_cannot_be_jacketed() {
        let mut input = vessel(VesselMaterial::Plastic);
        input.jacketed = true;
        assert!(validate_vessel_attributes(&input).is_err());
    }

    #[test]
    fn test_barrel_details_need_wood_or_flag() {
        let mut input = vessel(VesselMaterial::StainlessSteel);
        input.barrel = Some(BarrelAttributes::default());
        assert!(validate_vessel_attributes(&input).is_err());

        input.material = VesselMaterial::Wood;
        assert!(validate_vessel_attributes(&input).is_ok());

        input.material = VesselMaterial::Plastic;
        input.is_barrel = true;
        assert!(validate_vessel_attributes(&input).is_ok());
    }

    #[test]
    fn test_working_capacity_bounds() {
        let mut input = vessel(VesselMaterial::Glass);
        input.working_capacity = Some(dec("1200"));
        assert!(validate_vessel_attributes(&input).is_err());
        input.working_capacity = Some(dec("0"));
        assert!(validate_vessel_attributes(&input).is_err());
    }

    #[test]
    fn test_vessel_input_derive_runs_schema() {
        let mut input = vessel(VesselMaterial::Glass);
        input.is_pressure_vessel = true;
        assert!(input.validate().is_err());
    }

    // ========================================================================
    // Purchase Validation Tests
    // ========================================================================

    #[test]
    fn test_purchase_requires_lines() {
        let input = CreatePurchaseInput {
            vendor_id: Uuid::new_v4(),
            purchase_date: NaiveDate::from_ymd_opt(2024, 10, 3).unwrap(),
            notes: None,
            lines: vec![],
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_purchase_line_amounts_positive() {
        let mut input = CreatePurchaseInput {
            vendor_id: Uuid::new_v4(),
            purchase_date: NaiveDate::from_ymd_opt(2024, 10, 3).unwrap(),
            notes: None,
            lines: vec![line("20", "14.50")],
        };
        assert!(input.validate().is_ok());

        input.lines.push(line("0", "14.50"));
        assert!(input.validate().is_err());

        input.lines.pop();
        input.lines.push(line("5", "-1"));
        assert!(input.validate().is_err());
    }
}
