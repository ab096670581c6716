//! Packaging runs service

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use shared::{PackagingRun, PackagingRunQuery};

use crate::error::AppResult;
use crate::external::RpcClient;

/// Totals shown above the packaging runs table
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PackagingTotals {
    pub runs: usize,
    pub units_produced: u64,
    pub packaged_liters: Decimal,
    pub packaged_wine_gallons: Decimal,
    pub loss_liters: Decimal,
}

impl PackagingTotals {
    pub fn from_runs(runs: &[PackagingRun]) -> Self {
        Self {
            runs: runs.len(),
            units_produced: runs.iter().map(|r| u64::from(r.units_produced)).sum(),
            packaged_liters: runs.iter().map(PackagingRun::packaged_liters).sum(),
            packaged_wine_gallons: runs.iter().map(PackagingRun::packaged_wine_gallons).sum(),
            loss_liters: runs.iter().map(|r| r.loss_liters).sum(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackagingRunList {
    pub totals: PackagingTotals,
    pub runs: Vec<PackagingRun>,
}

#[derive(Clone)]
pub struct PackagingService {
    rpc: Arc<RpcClient>,
}

impl PackagingService {
    pub fn new(rpc: Arc<RpcClient>) -> Self {
        Self { rpc }
    }

    pub async fn list_runs(&self, query: &PackagingRunQuery) -> AppResult<Vec<PackagingRun>> {
        self.rpc.query("packaging.listRuns", query).await
    }

    pub async fn list_with_totals(&self, query: &PackagingRunQuery) -> AppResult<PackagingRunList> {
        let runs = self.list_runs(query).await?;
        Ok(PackagingRunList {
            totals: PackagingTotals::from_runs(&runs),
            runs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::PackageType;
    use uuid::Uuid;

    fn run(size_ml: i64, units: u32, loss: i64) -> PackagingRun {
        PackagingRun {
            id: Uuid::new_v4(),
            batch_id: Uuid::new_v4(),
            batch_name: "Dry".to_string(),
            package_type: PackageType::Bottle,
            package_size_ml: Decimal::from(size_ml),
            units_produced: units,
            volume_taken_liters: Decimal::from(100),
            loss_liters: Decimal::from(loss),
            run_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        }
    }

    #[test]
    fn test_totals() {
        let totals = PackagingTotals::from_runs(&[run(750, 100, 2), run(355, 200, 1)]);
        assert_eq!(totals.runs, 2);
        assert_eq!(totals.units_produced, 300);
        assert_eq!(totals.packaged_liters, Decimal::from(146));
        assert_eq!(totals.loss_liters, Decimal::from(3));
    }
}
