//! CSV export of already-fetched table data

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{BatchReconciliation, InventoryItem, PackagingRun, Purchase};
use crate::reconciliation::ReconciliationRow;
use crate::units::round_for_display;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv output was not valid UTF-8")]
    Encoding,
    #[error("row {row} has {found} cells, expected {expected}")]
    RowLength {
        row: usize,
        found: usize,
        expected: usize,
    },
}

/// Quote a single cell when it holds a comma, a quote or a line break.
/// Embedded quotes are doubled.
pub fn escape_csv_value(value: &str) -> String {
    if value.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Build CSV text from a header row and data rows. Every row must have as
/// many cells as there are headers.
pub fn array_to_csv<S: AsRef<str>>(headers: &[&str], rows: &[Vec<S>]) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(headers)?;
    for (index, row) in rows.iter().enumerate() {
        if row.len() != headers.len() {
            return Err(ExportError::RowLength {
                row: index,
                found: row.len(),
                expected: headers.len(),
            });
        }
        writer.write_record(row.iter().map(|cell| cell.as_ref()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))?;
    String::from_utf8(bytes).map_err(|_| ExportError::Encoding)
}

/// `reconciliation-2024-10-18.csv`
pub fn export_filename(prefix: &str, date: NaiveDate) -> String {
    format!("{}-{}.csv", prefix, date.format("%Y-%m-%d"))
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

pub fn reconciliation_csv(rows: &[ReconciliationRow]) -> Result<String, ExportError> {
    let headers = [
        "Batch",
        "Product Type",
        "Start Date",
        "Vessel",
        "Validation",
        "Verified",
        "Opening (gal)",
        "Production (gal)",
        "Losses (gal)",
        "Sales (gal)",
        "Distillation (gal)",
        "Ending (gal)",
        "Identity Check (gal)",
        "Drift (L)",
    ];
    let data: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            let b = &row.batch;
            let rec = row.reconciliation.as_ref();
            let metric = |f: fn(&BatchReconciliation) -> Decimal| {
                opt(rec.map(|r| round_for_display(f(r), 2)))
            };
            vec![
                b.batch.name.clone(),
                b.batch.product_type.to_string(),
                b.batch.start_date.to_string(),
                b.batch.vessel_name.clone().unwrap_or_default(),
                format!("{:?}", b.validation.status).to_lowercase(),
                if b.verified_for_year { "yes" } else { "no" }.to_string(),
                metric(|r| r.waterfall.opening),
                metric(|r| r.waterfall.production),
                metric(|r| r.waterfall.losses),
                metric(|r| r.waterfall.sales),
                metric(|r| r.waterfall.distillation),
                metric(|r| r.waterfall.ending),
                metric(|r| r.identity_check),
                metric(|r| r.drift_liters),
            ]
        })
        .collect();
    array_to_csv(&headers, &data)
}

pub fn purchases_csv(purchases: &[Purchase]) -> Result<String, ExportError> {
    let headers = ["Date", "Vendor", "Item", "Quantity", "Unit", "Unit Price", "Line Total"];
    let data: Vec<Vec<String>> = purchases
        .iter()
        .flat_map(|p| {
            p.lines.iter().map(move |line| {
                vec![
                    p.purchase_date.to_string(),
                    p.vendor_name.clone().unwrap_or_default(),
                    line.item_name.clone(),
                    line.quantity.normalize().to_string(),
                    line.unit.clone(),
                    round_for_display(line.unit_price, 2).to_string(),
                    round_for_display(line.line_total(), 2).to_string(),
                ]
            })
        })
        .collect();
    array_to_csv(&headers, &data)
}

pub fn packaging_runs_csv(runs: &[PackagingRun]) -> Result<String, ExportError> {
    let headers = [
        "Run Date",
        "Batch",
        "Package Type",
        "Size (mL)",
        "Units",
        "Volume Taken (L)",
        "Loss (L)",
    ];
    let data: Vec<Vec<String>> = runs
        .iter()
        .map(|run| {
            vec![
                run.run_date.to_string(),
                run.batch_name.clone(),
                format!("{:?}", run.package_type).to_lowercase(),
                run.package_size_ml.normalize().to_string(),
                run.units_produced.to_string(),
                round_for_display(run.volume_taken_liters, 1).to_string(),
                round_for_display(run.loss_liters, 1).to_string(),
            ]
        })
        .collect();
    array_to_csv(&headers, &data)
}

pub fn inventory_csv(items: &[InventoryItem]) -> Result<String, ExportError> {
    let headers = ["Material", "Name", "On Hand", "Unit", "Location"];
    let data: Vec<Vec<String>> = items
        .iter()
        .map(|item| {
            vec![
                item.material_type.to_string(),
                item.name.clone(),
                round_for_display(item.quantity_on_hand, 2).to_string(),
                item.unit.clone(),
                item.location.clone().unwrap_or_default(),
            ]
        })
        .collect();
    array_to_csv(&headers, &data)
}
