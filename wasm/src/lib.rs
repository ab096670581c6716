//! WebAssembly module for the Cidery Management Platform
//!
//! Provides client-side computation for:
//! - Volume and weight unit conversion
//! - Transfer checks before submit
//! - The reconciliation filter/sort pipeline and view state
//! - CSV export of fetched tables
//!
//! Structured values cross the boundary as JSON strings.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::reconciliation::{CheckIndicator, ReconciliationView, SortField, ViewAction};
use shared::transfer::{check_transfer, TransferRequest};
use shared::{ReconciliationSummary, ReportingPeriod, VesselLiquid, VolumeUnit, WeightUnit};
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::units::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&JsValue::from_str("cidery wasm module loaded"));
}

fn js_error(message: String) -> JsValue {
    web_sys::console::warn_1(&JsValue::from_str(&message));
    JsValue::from_str(&message)
}

fn from_json<T: DeserializeOwned>(what: &str, json: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid {} JSON: {}", what, e))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Failed to encode result: {}", e))
}

fn parse_decimal(value: &str) -> Result<Decimal, String> {
    Decimal::from_str(value.trim()).map_err(|_| format!("Invalid number: {}", value))
}

fn out_of_range() -> String {
    "Value is too large to convert".to_string()
}

/// Unit names accept the serialized form (`gallons`) or the symbol (`gal`)
fn parse_unit<U: DeserializeOwned>(name: &str) -> Result<U, String> {
    serde_json::from_value(serde_json::Value::String(name.to_string()))
        .map_err(|_| format!("Unknown unit: {}", name))
}

fn volume(value: &str, from: &str, to: &str) -> Result<String, String> {
    let from: VolumeUnit = parse_unit(from)?;
    let to: VolumeUnit = parse_unit(to)?;
    shared::convert_volume(parse_decimal(value)?, from, to)
        .map(|v| v.to_string())
        .ok_or_else(out_of_range)
}

fn weight(value: &str, from: &str, to: &str) -> Result<String, String> {
    let from: WeightUnit = parse_unit(from)?;
    let to: WeightUnit = parse_unit(to)?;
    shared::convert_weight(parse_decimal(value)?, from, to)
        .map(|v| v.to_string())
        .ok_or_else(out_of_range)
}

fn transfer_check(source: &str, destination: &str, request: &str) -> Result<String, String> {
    let source: VesselLiquid = from_json("source vessel", source)?;
    let destination: VesselLiquid = from_json("destination vessel", destination)?;
    let request: TransferRequest = from_json("transfer", request)?;
    to_json(&check_transfer(&source, &destination, &request))
}

fn view_rows(view: &str, batches: &str, summary: &str) -> Result<String, String> {
    let view: ReconciliationView = from_json("view", view)?;
    let batches: Vec<BatchWithValidation> = from_json("batches", batches)?;
    let summary: ReconciliationSummary = from_json("summary", summary)?;
    to_json(&view.rows(&batches, &summary))
}

fn view_dispatch(view: &str, action: &str) -> Result<String, String> {
    let mut view: ReconciliationView = from_json("view", view)?;
    view.dispatch(from_json::<ViewAction>("action", action)?);
    to_json(&view)
}

fn view_csv(view: &str, batches: &str, summary: &str) -> Result<String, String> {
    let view: ReconciliationView = from_json("view", view)?;
    let batches: Vec<BatchWithValidation> = from_json("batches", batches)?;
    let summary: ReconciliationSummary = from_json("summary", summary)?;
    shared::export::reconciliation_csv(&view.rows(&batches, &summary)).map_err(|e| e.to_string())
}

fn table_csv(headers: &str, rows: &str) -> Result<String, String> {
    let headers: Vec<String> = from_json("headers", headers)?;
    let rows: Vec<Vec<String>> = from_json("rows", rows)?;
    let header_refs: Vec<&str> = headers.iter().map(String::as_str).collect();
    shared::export::array_to_csv(&header_refs, &rows).map_err(|e| e.to_string())
}

fn period_from_query(query: &str, default_year: i32) -> Result<String, String> {
    let period = ReportingPeriod::from_query_string(query, default_year).map_err(str::to_string)?;
    to_json(&period)
}

/// Convert a volume, e.g. `convert_volume_units("10", "gal", "L")`
#[wasm_bindgen]
pub fn convert_volume_units(value: &str, from: &str, to: &str) -> Result<String, JsValue> {
    volume(value, from, to).map_err(js_error)
}

#[wasm_bindgen]
pub fn convert_weight_units(value: &str, from: &str, to: &str) -> Result<String, JsValue> {
    weight(value, from, to).map_err(js_error)
}

/// Liters to TTB wine gallons
#[wasm_bindgen]
pub fn wine_gallons(liters: &str) -> Result<String, JsValue> {
    parse_decimal(liters)
        .map(|l| shared::liters_to_wine_gallons(l).to_string())
        .map_err(js_error)
}

/// Display string such as `125.50 gal`
#[wasm_bindgen]
pub fn format_volume_display(value: &str, unit: &str, decimal_places: u32) -> Result<String, JsValue> {
    let unit: VolumeUnit = parse_unit(unit).map_err(js_error)?;
    let value = parse_decimal(value).map_err(js_error)?;
    Ok(shared::format_volume(value, unit, decimal_places))
}

/// Run the transfer form checks. Returns the check as JSON.
#[wasm_bindgen]
pub fn check_transfer_json(
    source_json: &str,
    destination_json: &str,
    request_json: &str,
) -> Result<String, JsValue> {
    transfer_check(source_json, destination_json, request_json).map_err(js_error)
}

/// Identity badge for a signed residual in wine gallons
#[wasm_bindgen]
pub fn identity_badge(identity_check: &str) -> Result<String, JsValue> {
    let value = parse_decimal(identity_check).map_err(js_error)?;
    to_json(&CheckIndicator::identity(value)).map_err(js_error)
}

/// Filtered and sorted reconciliation rows for a view state
#[wasm_bindgen]
pub fn reconciliation_rows(
    view_json: &str,
    batches_json: &str,
    summary_json: &str,
) -> Result<String, JsValue> {
    view_rows(view_json, batches_json, summary_json).map_err(js_error)
}

/// Apply a UI action to a view state and return the new state
#[wasm_bindgen]
pub fn dispatch_view_action(view_json: &str, action_json: &str) -> Result<String, JsValue> {
    view_dispatch(view_json, action_json).map_err(js_error)
}

#[wasm_bindgen]
pub fn reconciliation_csv(
    view_json: &str,
    batches_json: &str,
    summary_json: &str,
) -> Result<String, JsValue> {
    view_csv(view_json, batches_json, summary_json).map_err(js_error)
}

/// CSV from a JSON array of headers and a JSON array of string rows
#[wasm_bindgen]
pub fn array_to_csv(headers_json: &str, rows_json: &str) -> Result<String, JsValue> {
    table_csv(headers_json, rows_json).map_err(js_error)
}

#[wasm_bindgen]
pub fn escape_csv_value(value: &str) -> String {
    shared::export::escape_csv_value(value)
}

/// Parse `?year=2024&period=q2` into a reporting period
#[wasm_bindgen]
pub fn reporting_period_from_query(query: &str, default_year: i32) -> Result<String, JsValue> {
    period_from_query(query, default_year).map_err(js_error)
}

/// Sortable column keys in header order
#[wasm_bindgen]
pub fn sort_fields() -> js_sys::Array {
    SortField::ALL
        .iter()
        .filter_map(|f| serde_json::to_value(f).ok())
        .filter_map(|v| v.as_str().map(JsValue::from_str))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn id(n: u8) -> String {
        format!("00000000-0000-0000-0000-0000000000{:02}", n)
    }

    fn vessel_json(vessel_id: u8, capacity: i64) -> Value {
        json!({
            "id": id(vessel_id), "name": "T", "capacity": capacity.to_string(),
            "capacityUnit": "liters", "workingCapacity": null, "material": "stainless_steel",
            "barrel": null, "status": "available", "location": null,
            "createdAt": "2024-10-01T00:00:00Z"
        })
    }

    #[test]
    fn test_volume_conversion_accepts_symbols() {
        let liters = volume("10", "gal", "L").unwrap();
        assert_eq!(Decimal::from_str(&liters).unwrap(), Decimal::new(3_785_411_784, 8));
        assert_eq!(
            Decimal::from_str(&volume("1500", "milliliters", "liters").unwrap()).unwrap(),
            Decimal::new(15, 1)
        );
    }

    #[test]
    fn test_unknown_unit() {
        assert_eq!(
            volume("1", "hogshead", "L").unwrap_err(),
            "Unknown unit: hogshead"
        );
    }

    #[test]
    fn test_oversized_value_is_an_error() {
        assert_eq!(
            volume("79228162514264337593543950335", "gal", "L").unwrap_err(),
            "Value is too large to convert"
        );
        assert!(weight("79228162514264337593543950335", "kg", "g").is_err());

        let source = json!({
            "vessel": vessel_json(1, 500), "batchId": id(9),
            "batchName": "Dabinett 24", "currentVolumeLiters": "100"
        });
        let destination = json!({ "vessel": vessel_json(2, 500), "currentVolumeLiters": "0" });
        let request = json!({
            "sourceVesselId": id(1), "destinationVesselId": id(2),
            "batchId": id(9), "transferVolume": "79228162514264337593543950335",
            "unit": "gal"
        });
        let check: Value = serde_json::from_str(
            &transfer_check(&source.to_string(), &destination.to_string(), &request.to_string())
                .unwrap(),
        )
        .unwrap();
        assert!(check["errors"]
            .as_array()
            .unwrap()
            .contains(&json!("Transfer volume is too large")));
    }

    #[test]
    fn test_weight_conversion() {
        assert_eq!(
            Decimal::from_str(&weight("1", "bushel", "lb").unwrap()).unwrap(),
            Decimal::from(42)
        );
    }

    #[test]
    fn test_dispatch_round_trip() {
        let view = ReconciliationView::new(ReportingPeriod::annual(2024));
        let view_json = serde_json::to_string(&view).unwrap();
        let action = json!({ "type": "sort_by", "value": "drift" }).to_string();

        let next: Value = serde_json::from_str(&view_dispatch(&view_json, &action).unwrap()).unwrap();
        assert_eq!(next["sort"]["field"], "drift");
        assert_eq!(next["sort"]["direction"], "asc");
    }

    #[test]
    fn test_table_csv() {
        let csv = table_csv(r#"["Name","Notes"]"#, r#"[["Dabinett","sharp, tannic"]]"#).unwrap();
        assert_eq!(csv, "Name,Notes\nDabinett,\"sharp, tannic\"\n");
    }

    #[test]
    fn test_period_from_query() {
        let period: Value = serde_json::from_str(&period_from_query("?year=2023&period=q2", 2024).unwrap()).unwrap();
        assert_eq!(period, json!({ "year": 2023, "period": "q2" }));
        assert!(period_from_query("period=m13", 2024).is_err());
    }
}
