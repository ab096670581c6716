//! Volume and weight unit conversion
//!
//! All conversions are exact `Decimal` arithmetic. Nothing here rounds;
//! rounding happens only in the `format_*` helpers used at display time.
//! Conversions that can grow a value return `None` when the result does
//! not fit in a `Decimal`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Liters in one US gallon (231 cubic inches).
pub const LITERS_PER_GALLON: Decimal = Decimal::from_parts(3_785_411_784, 0, 0, false, 9);

/// Liters in one TTB wine gallon. TTB reporting uses the 231 in³ gallon,
/// so this is the same factor as [`LITERS_PER_GALLON`], kept separate so the
/// reporting path never depends on the display unit.
pub const LITERS_PER_WINE_GALLON: Decimal = Decimal::from_parts(3_785_411_784, 0, 0, false, 9);

/// Kilograms per avoirdupois pound.
pub const KG_PER_POUND: Decimal = Decimal::from_parts(45_359_237, 0, 0, false, 8);

/// Pounds in one bushel of apples.
pub const POUNDS_PER_APPLE_BUSHEL: Decimal = Decimal::from_parts(42, 0, 0, false, 0);

/// Kilograms in one bushel of apples (42 lb).
pub const KG_PER_APPLE_BUSHEL: Decimal = Decimal::from_parts(1_905_087_954, 0, 0, false, 8);

const LITERS_PER_MILLILITER: Decimal = Decimal::from_parts(1, 0, 0, false, 3);
const KG_PER_GRAM: Decimal = Decimal::from_parts(1, 0, 0, false, 3);

/// Volume units accepted by forms and displays
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum VolumeUnit {
    #[default]
    #[serde(alias = "L")]
    Liters,
    #[serde(alias = "mL")]
    Milliliters,
    #[serde(alias = "gal")]
    Gallons,
}

impl VolumeUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            VolumeUnit::Liters => "L",
            VolumeUnit::Milliliters => "mL",
            VolumeUnit::Gallons => "gal",
        }
    }

    /// How many liters one of this unit holds
    fn liters_per_unit(&self) -> Decimal {
        match self {
            VolumeUnit::Liters => Decimal::ONE,
            VolumeUnit::Milliliters => LITERS_PER_MILLILITER,
            VolumeUnit::Gallons => LITERS_PER_GALLON,
        }
    }
}

impl std::fmt::Display for VolumeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl std::str::FromStr for VolumeUnit {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "L" | "l" | "liters" | "liter" => Ok(VolumeUnit::Liters),
            "mL" | "ml" | "milliliters" | "milliliter" => Ok(VolumeUnit::Milliliters),
            "gal" | "gallons" | "gallon" => Ok(VolumeUnit::Gallons),
            _ => Err("Unknown volume unit"),
        }
    }
}

/// Weight units used for fruit and additives
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeightUnit {
    #[default]
    #[serde(alias = "kg")]
    Kilograms,
    #[serde(alias = "g")]
    Grams,
    #[serde(alias = "lb")]
    Pounds,
    #[serde(alias = "bushel")]
    Bushels,
}

impl WeightUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            WeightUnit::Kilograms => "kg",
            WeightUnit::Grams => "g",
            WeightUnit::Pounds => "lb",
            WeightUnit::Bushels => "bu",
        }
    }

    fn kg_per_unit(&self) -> Decimal {
        match self {
            WeightUnit::Kilograms => Decimal::ONE,
            WeightUnit::Grams => KG_PER_GRAM,
            WeightUnit::Pounds => KG_PER_POUND,
            WeightUnit::Bushels => KG_PER_APPLE_BUSHEL,
        }
    }
}

impl std::fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Convert a volume between units
pub fn convert_volume(value: Decimal, from: VolumeUnit, to: VolumeUnit) -> Option<Decimal> {
    if from == to {
        return Some(value);
    }
    let liters = value.checked_mul(from.liters_per_unit())?;
    match to {
        VolumeUnit::Liters => Some(liters),
        other => liters.checked_div(other.liters_per_unit()),
    }
}

/// Convert any volume to canonical liters
pub fn to_liters(value: Decimal, unit: VolumeUnit) -> Option<Decimal> {
    convert_volume(value, unit, VolumeUnit::Liters)
}

/// Convert liters to TTB wine gallons
pub fn liters_to_wine_gallons(liters: Decimal) -> Decimal {
    // Dividing by a factor above one cannot overflow
    liters / LITERS_PER_WINE_GALLON
}

/// Convert TTB wine gallons to liters
pub fn wine_gallons_to_liters(wine_gallons: Decimal) -> Option<Decimal> {
    wine_gallons.checked_mul(LITERS_PER_WINE_GALLON)
}

/// Convert a weight between units
pub fn convert_weight(value: Decimal, from: WeightUnit, to: WeightUnit) -> Option<Decimal> {
    if from == to {
        return Some(value);
    }
    let kg = value.checked_mul(from.kg_per_unit())?;
    match to {
        WeightUnit::Kilograms => Some(kg),
        other => kg.checked_div(other.kg_per_unit()),
    }
}

/// Convert apple bushels to kilograms
pub fn bushels_to_kg(bushels: Decimal) -> Option<Decimal> {
    convert_weight(bushels, WeightUnit::Bushels, WeightUnit::Kilograms)
}

/// Round for display. Only call this on the final value.
pub fn round_for_display(value: Decimal, decimal_places: u32) -> Decimal {
    value.round_dp(decimal_places)
}

/// Format a volume for display, e.g. `"125.50 gal"`
pub fn format_volume(value: Decimal, unit: VolumeUnit, decimal_places: u32) -> String {
    format!(
        "{:.*} {}",
        decimal_places as usize,
        round_for_display(value, decimal_places),
        unit.symbol()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_gallons_to_liters() {
        let liters = convert_volume(dec("10"), VolumeUnit::Gallons, VolumeUnit::Liters);
        assert_eq!(liters, Some(dec("37.85411784")));
    }

    #[test]
    fn test_gallon_round_trip() {
        let liters = convert_volume(dec("10"), VolumeUnit::Gallons, VolumeUnit::Liters).unwrap();
        let back = convert_volume(liters, VolumeUnit::Liters, VolumeUnit::Gallons).unwrap();
        assert!((back - dec("10")).abs() < dec("0.0000001"));
    }

    #[test]
    fn test_same_unit_is_identity() {
        let v = dec("12.345678");
        assert_eq!(convert_volume(v, VolumeUnit::Gallons, VolumeUnit::Gallons), Some(v));
    }

    #[test]
    fn test_milliliters() {
        assert_eq!(
            convert_volume(dec("750"), VolumeUnit::Milliliters, VolumeUnit::Liters),
            Some(dec("0.750"))
        );
    }

    #[test]
    fn test_wine_gallons() {
        let wg = liters_to_wine_gallons(dec("378.5411784"));
        assert_eq!(wg, dec("100"));
        assert_eq!(wine_gallons_to_liters(dec("1")), Some(LITERS_PER_WINE_GALLON));
    }

    #[test]
    fn test_bushels_to_kg() {
        // 42 lb * 0.45359237
        assert_eq!(bushels_to_kg(dec("1")), Some(dec("19.05087954")));
        assert_eq!(KG_PER_APPLE_BUSHEL, POUNDS_PER_APPLE_BUSHEL * KG_PER_POUND);
    }

    #[test]
    fn test_pounds_to_kg() {
        assert_eq!(
            convert_weight(dec("100"), WeightUnit::Pounds, WeightUnit::Kilograms),
            Some(dec("45.359237"))
        );
    }

    #[test]
    fn test_overflow_is_none() {
        assert_eq!(convert_volume(Decimal::MAX, VolumeUnit::Gallons, VolumeUnit::Liters), None);
        assert_eq!(convert_volume(Decimal::MAX, VolumeUnit::Liters, VolumeUnit::Milliliters), None);
        assert_eq!(convert_weight(Decimal::MAX, WeightUnit::Kilograms, WeightUnit::Grams), None);
        assert_eq!(wine_gallons_to_liters(Decimal::MAX), None);
        // Shrinking conversions still work at the top of the range
        assert!(convert_volume(Decimal::MAX, VolumeUnit::Liters, VolumeUnit::Gallons).is_some());
        assert!(liters_to_wine_gallons(Decimal::MAX) > Decimal::ZERO);
    }

    #[test]
    fn test_format_volume() {
        assert_eq!(format_volume(dec("125.456"), VolumeUnit::Gallons, 2), "125.46 gal");
        assert_eq!(format_volume(dec("10"), VolumeUnit::Liters, 1), "10.0 L");
    }

    #[test]
    fn test_parse_unit() {
        assert_eq!(VolumeUnit::from_str("gal").unwrap(), VolumeUnit::Gallons);
        assert_eq!(VolumeUnit::from_str("L").unwrap(), VolumeUnit::Liters);
        assert!(VolumeUnit::from_str("barrel").is_err());
    }
}
