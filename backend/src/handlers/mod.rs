//! HTTP request handlers

pub mod documents;
pub mod health;
pub mod inventory;
pub mod packaging;
pub mod purchase;
pub mod reconciliation;
pub mod transfer;
pub mod units;
pub mod vendor;
pub mod vessel;

pub use documents::*;
pub use health::*;
pub use inventory::*;
pub use packaging::*;
pub use purchase::*;
pub use reconciliation::*;
pub use transfer::*;
pub use units::*;
pub use vendor::*;
pub use vessel::*;
