//! Unit conversion endpoints

use axum::{extract::Query, Json};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{
    convert_volume, convert_weight, format_volume, liters_to_wine_gallons, to_liters, VolumeUnit,
    WeightUnit,
};

use crate::error::{AppError, AppResult};

const DISPLAY_DECIMAL_PLACES: u32 = 2;

#[derive(Debug, Deserialize)]
pub struct ConversionQuery<U> {
    pub value: Decimal,
    pub from: U,
    pub to: U,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeConversion {
    pub value: Decimal,
    pub from: VolumeUnit,
    pub to: VolumeUnit,
    pub result: Decimal,
    pub wine_gallons: Decimal,
    pub display: String,
}

fn out_of_range() -> AppError {
    AppError::Validation {
        field: "value".to_string(),
        message: "Value is too large to convert".to_string(),
    }
}

pub async fn convert_volume_units(
    Query(query): Query<ConversionQuery<VolumeUnit>>,
) -> AppResult<Json<VolumeConversion>> {
    let result = convert_volume(query.value, query.from, query.to).ok_or_else(out_of_range)?;
    let liters = to_liters(query.value, query.from).ok_or_else(out_of_range)?;
    Ok(Json(VolumeConversion {
        value: query.value,
        from: query.from,
        to: query.to,
        result,
        wine_gallons: liters_to_wine_gallons(liters),
        display: format_volume(result, query.to, DISPLAY_DECIMAL_PLACES),
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightConversion {
    pub value: Decimal,
    pub from: WeightUnit,
    pub to: WeightUnit,
    pub result: Decimal,
}

pub async fn convert_weight_units(
    Query(query): Query<ConversionQuery<WeightUnit>>,
) -> AppResult<Json<WeightConversion>> {
    Ok(Json(WeightConversion {
        value: query.value,
        from: query.from,
        to: query.to,
        result: convert_weight(query.value, query.from, query.to).ok_or_else(out_of_range)?,
    }))
}
