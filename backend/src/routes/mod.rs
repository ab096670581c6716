//! Route definitions for the Cidery Management Platform

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/cache", delete(handlers::clear_cache))
        .nest("/reconciliation", reconciliation_routes())
        .nest("/batches", batch_routes())
        .nest("/vessels", vessel_routes())
        .nest("/transfers", transfer_routes())
        .nest("/vendors", vendor_routes())
        .nest("/purchases", purchase_routes())
        .nest("/inventory", inventory_routes())
        .nest("/packaging", packaging_routes())
        .nest("/units", unit_routes())
        .nest("/ttb", ttb_routes())
        .route(
            "/barrel-origin-types",
            get(handlers::list_barrel_origin_types),
        )
}

/// TTB reconciliation table
fn reconciliation_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_reconciliation))
        .route("/export", get(handlers::export_reconciliation_csv))
}

/// Batch reconciliation status actions
fn batch_routes() -> Router<AppState> {
    Router::new()
        .route("/verify", post(handlers::bulk_verify))
        .route("/:batch_id/reconciliation", post(handlers::apply_batch_action))
}

fn vessel_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_vessels).post(handlers::create_vessel))
        .route("/map", get(handlers::get_cellar_map))
        .route(
            "/:vessel_id",
            get(handlers::get_vessel).put(handlers::update_vessel),
        )
        .route("/:vessel_id/status", put(handlers::update_vessel_status))
}

/// Transfers and blend confirmation
fn transfer_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::submit_transfer))
        .route("/check", post(handlers::check_transfer))
        .route(
            "/confirmations/:token",
            post(handlers::confirm_blend).delete(handlers::cancel_blend),
        )
}

fn vendor_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_vendors).post(handlers::create_vendor))
        .route(
            "/:vendor_id",
            get(handlers::get_vendor)
                .put(handlers::update_vendor)
                .delete(handlers::delete_vendor),
        )
        .route(
            "/:vendor_id/varieties",
            get(handlers::list_varieties).post(handlers::add_variety),
        )
        .route(
            "/:vendor_id/varieties/:variety_id",
            delete(handlers::remove_variety),
        )
}

fn purchase_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_purchases).post(handlers::create_purchase))
        .route("/export", get(handlers::export_purchases_csv))
        .route(
            "/:purchase_id",
            get(handlers::get_purchase)
                .put(handlers::update_purchase)
                .delete(handlers::delete_purchase),
        )
        .route("/:purchase_id/receipt", get(handlers::get_purchase_receipt))
        .route(
            "/:purchase_id/receipt.pdf",
            get(handlers::download_purchase_receipt_pdf),
        )
}

fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_inventory))
        .route("/export", get(handlers::export_inventory_csv))
        .route(
            "/transactions",
            get(handlers::list_transactions).post(handlers::record_transaction),
        )
}

fn packaging_routes() -> Router<AppState> {
    Router::new()
        .route("/runs", get(handlers::list_packaging_runs))
        .route("/runs/export", get(handlers::export_packaging_runs_csv))
}

fn unit_routes() -> Router<AppState> {
    Router::new()
        .route("/volume", get(handlers::convert_volume_units))
        .route("/weight", get(handlers::convert_weight_units))
}

fn ttb_routes() -> Router<AppState> {
    Router::new()
        .route("/preview", get(handlers::get_ttb_preview))
        .route("/form.pdf", get(handlers::download_ttb_pdf))
}
