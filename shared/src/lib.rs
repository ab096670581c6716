//! Shared types and domain logic for the Cidery Management Platform
//!
//! This crate contains the models, unit conversions, validation rules and
//! reconciliation/transfer logic shared between the backend and the
//! browser (via WASM).

pub mod export;
pub mod models;
pub mod reconciliation;
pub mod transfer;
pub mod types;
pub mod units;
pub mod validation;

pub use models::*;
pub use types::*;
pub use units::*;
pub use validation::*;
