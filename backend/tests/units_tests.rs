//! Unit conversion tests

use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    bushels_to_kg, convert_volume, convert_weight, format_volume, liters_to_wine_gallons,
    round_for_display, wine_gallons_to_liters, VolumeUnit, WeightUnit,
};

fn volume_unit_strategy() -> impl Strategy<Value = VolumeUnit> {
    prop_oneof![
        Just(VolumeUnit::Liters),
        Just(VolumeUnit::Milliliters),
        Just(VolumeUnit::Gallons),
    ]
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_ten_gallons_round_trip() {
        let liters =
            convert_volume(Decimal::from(10), VolumeUnit::Gallons, VolumeUnit::Liters).unwrap();
        assert_eq!(round_for_display(liters, 2), Decimal::new(3785, 2));

        let back = convert_volume(liters, VolumeUnit::Liters, VolumeUnit::Gallons).unwrap();
        assert_eq!(round_for_display(back, 6), Decimal::from(10));
    }

    #[test]
    fn test_wine_gallons() {
        let gallons = liters_to_wine_gallons(Decimal::new(3_785_411_784, 9));
        assert_eq!(gallons, Decimal::ONE);
        assert_eq!(wine_gallons_to_liters(Decimal::ONE), Some(Decimal::new(3_785_411_784, 9)));
    }

    #[test]
    fn test_bushel_of_apples() {
        // 42 lb
        assert_eq!(
            round_for_display(bushels_to_kg(Decimal::ONE).unwrap(), 3),
            Decimal::new(19_051, 3)
        );
        assert_eq!(
            convert_weight(Decimal::ONE, WeightUnit::Bushels, WeightUnit::Pounds),
            Some(Decimal::from(42))
        );
    }

    #[test]
    fn test_largest_value_does_not_panic() {
        let max = Decimal::MAX;
        assert_eq!(convert_volume(max, VolumeUnit::Gallons, VolumeUnit::Liters), None);
        assert_eq!(convert_weight(max, WeightUnit::Bushels, WeightUnit::Kilograms), None);
        assert_eq!(bushels_to_kg(max), None);
        assert!(convert_volume(max, VolumeUnit::Milliliters, VolumeUnit::Liters).is_some());
    }

    #[test]
    fn test_display_rounding() {
        assert_eq!(
            format_volume(Decimal::new(125_456, 3), VolumeUnit::Gallons, 2),
            "125.46 gal"
        );
        assert_eq!(format_volume(Decimal::from(5), VolumeUnit::Liters, 1), "5.0 L");
    }
}

proptest! {
    /// Converting there and back loses nothing visible at 6 decimal places
    #[test]
    fn prop_volume_round_trip(
        hundredths in 0i64..10_000_000,
        from in volume_unit_strategy(),
        to in volume_unit_strategy(),
    ) {
        let value = Decimal::new(hundredths, 2);
        let there = convert_volume(value, from, to).unwrap();
        let back = convert_volume(there, to, from).unwrap();
        prop_assert!((back - value).abs() < Decimal::new(1, 6), "{} -> {} -> {}", value, there, back);
    }

    /// Any value either converts or reports overflow; nothing panics
    #[test]
    fn prop_conversion_total(
        (lo, mid, hi) in (any::<u32>(), any::<u32>(), any::<u32>()),
        negative in any::<bool>(),
        scale in 0u32..=28,
        from in volume_unit_strategy(),
        to in volume_unit_strategy(),
    ) {
        let value = Decimal::from_parts(lo, mid, hi, negative, scale);
        let converted = convert_volume(value, from, to);
        if from == to {
            prop_assert_eq!(converted, Some(value));
        }
    }

    /// Same unit is the identity
    #[test]
    fn prop_same_unit_identity(hundredths in 0i64..10_000_000, unit in volume_unit_strategy()) {
        let value = Decimal::new(hundredths, 2);
        prop_assert_eq!(convert_volume(value, unit, unit), Some(value));
    }
}
