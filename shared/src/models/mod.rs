//! Domain models for the Cidery Management Platform

mod batch;
mod inventory;
mod packaging;
mod purchase;
mod reconciliation;
mod vendor;
mod vessel;

pub use batch::*;
pub use inventory::*;
pub use packaging::*;
pub use purchase::*;
pub use reconciliation::*;
pub use vendor::*;
pub use vessel::*;
