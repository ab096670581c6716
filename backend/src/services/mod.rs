//! Business logic services for the Cidery Management Platform
//!
//! Each service wraps the shared RPC client for one resource group.

pub mod documents;
pub mod inventory;
pub mod packaging;
pub mod purchase;
pub mod reconciliation;
pub mod transfer;
pub mod vendor;
pub mod vessel;

pub use documents::DocumentService;
pub use inventory::InventoryService;
pub use packaging::PackagingService;
pub use purchase::PurchaseService;
pub use reconciliation::ReconciliationService;
pub use transfer::TransferService;
pub use vendor::VendorService;
pub use vessel::VesselService;
