//! Packaging run models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::units::liters_to_wine_gallons;

/// A bottling, canning or kegging run drawn from a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackagingRun {
    pub id: Uuid,
    pub batch_id: Uuid,
    pub batch_name: String,
    pub package_type: PackageType,
    pub package_size_ml: Decimal,
    pub units_produced: u32,
    pub volume_taken_liters: Decimal,
    #[serde(default)]
    pub loss_liters: Decimal,
    pub run_date: NaiveDate,
}

impl PackagingRun {
    /// Liquid that actually ended up in packages
    pub fn packaged_liters(&self) -> Decimal {
        self.package_size_ml * Decimal::from(self.units_produced) / Decimal::from(1000)
    }

    pub fn packaged_wine_gallons(&self) -> Decimal {
        liters_to_wine_gallons(self.packaged_liters())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PackageType {
    Bottle,
    Can,
    Keg,
}

/// Sort and filter options for the packaging runs table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackagingRunQuery {
    pub batch_id: Option<Uuid>,
    pub package_type: Option<PackageType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub limit: Option<u32>,
    pub offset: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packaged_liters() {
        let run = PackagingRun {
            id: Uuid::new_v4(),
            batch_id: Uuid::new_v4(),
            batch_name: "Dry 2024".to_string(),
            package_type: PackageType::Bottle,
            package_size_ml: Decimal::from(750),
            units_produced: 120,
            volume_taken_liters: Decimal::from(92),
            loss_liters: Decimal::from(2),
            run_date: NaiveDate::from_ymd_opt(2024, 11, 2).unwrap(),
        };
        assert_eq!(run.packaged_liters(), Decimal::from(90));
    }
}
