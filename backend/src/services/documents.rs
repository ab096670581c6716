//! Documents service: PDF report downloads and the TTB form preview

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use shared::reconciliation::{BatchIssues, CheckIndicator, WaterfallBreakdown};
use shared::{round_for_display, ReconciliationSummary, ReportingPeriod};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::external::RpcClient;

/// Wine gallons on printed forms
pub const FORM_DECIMAL_PLACES: u32 = 2;

/// A report as the PDF procedures return it
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfPayload {
    /// Base64-encoded PDF bytes
    pub data: String,
    pub filename: Option<String>,
}

/// Decoded PDF ready to serve as an attachment
#[derive(Debug, Clone)]
pub struct PdfDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl PdfDocument {
    pub fn decode(payload: PdfPayload, fallback_name: &str) -> AppResult<Self> {
        let bytes = STANDARD
            .decode(payload.data.trim())
            .map_err(|e| AppError::InvalidResponse(format!("PDF payload is not base64: {}", e)))?;
        if bytes.is_empty() {
            return Err(AppError::InvalidResponse("PDF payload is empty".to_string()));
        }
        let filename = payload
            .filename
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| fallback_name.to_string());
        Ok(Self { filename, bytes })
    }

    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename.replace('"', ""))
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FormLine {
    pub label: &'static str,
    pub wine_gallons: Decimal,
}

/// TTB Form 5120.17 preview, rounded for display
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TtbFormPreview {
    pub period: ReportingPeriod,
    pub period_label: String,
    pub is_finalized: bool,
    pub lines: Vec<FormLine>,
    pub identity: CheckIndicator,
    pub batch_count: usize,
    pub batches_with_issues: usize,
}

impl TtbFormPreview {
    pub fn build(summary: &ReconciliationSummary) -> Self {
        let breakdown = WaterfallBreakdown::from_waterfall(summary.totals);
        let w = &breakdown.waterfall;
        let line = |label, value: Decimal| FormLine {
            label,
            wine_gallons: round_for_display(value, FORM_DECIMAL_PLACES),
        };

        Self {
            period: summary.period,
            period_label: summary.period.to_string(),
            is_finalized: summary.is_finalized,
            lines: vec![
                line("On hand beginning of period", w.opening),
                line("Produced by fermentation", w.production),
                line("Losses", w.losses),
                line("Removed taxpaid", w.sales),
                line("Used for distilling material", w.distillation),
                line("Expected on hand end of period", breakdown.expected_ending),
                line("On hand end of period", w.ending),
            ],
            identity: CheckIndicator::identity(summary.identity_check),
            batch_count: summary.batches.len(),
            batches_with_issues: summary
                .batches
                .iter()
                .filter(|b| BatchIssues::from_reconciliation(b).any())
                .count(),
        }
    }
}

#[derive(Clone)]
pub struct DocumentService {
    rpc: Arc<RpcClient>,
}

impl DocumentService {
    pub fn new(rpc: Arc<RpcClient>) -> Self {
        Self { rpc }
    }

    pub async fn ttb_preview(&self, period: &ReportingPeriod) -> AppResult<TtbFormPreview> {
        let summary: ReconciliationSummary =
            self.rpc.query("ttb.getReconciliationSummary", period).await?;
        Ok(TtbFormPreview::build(&summary))
    }

    /// PDF generation is a mutation upstream. It changes no cached data,
    /// so nothing is invalidated.
    pub async fn ttb_form_pdf(&self, period: &ReportingPeriod) -> AppResult<PdfDocument> {
        let payload: PdfPayload = self
            .rpc
            .mutate("pdfReports.ttbForm", period, &[])
            .await
            .map_err(|e| e.titled("Download failed"))?;
        let fallback = format!("ttb-5120-17-{}.pdf", period.to_string().replace(' ', "-"));
        PdfDocument::decode(payload, &fallback)
    }

    pub async fn purchase_receipt_pdf(&self, purchase_id: Uuid) -> AppResult<PdfDocument> {
        let payload: PdfPayload = self
            .rpc
            .mutate("pdfReports.purchaseReceipt", &json!({ "id": purchase_id }), &[])
            .await
            .map_err(|e| e.titled("Download failed"))?;
        PdfDocument::decode(payload, &format!("purchase-{}.pdf", purchase_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{routing::post, Json, Router};
    use serde_json::Value;
    use shared::{BatchReconciliation, Waterfall};

    async fn pdf_payload() -> Json<Value> {
        Json(json!({
            "result": { "data": { "data": STANDARD.encode(b"%PDF-1.7"), "filename": "report.pdf" } }
        }))
    }

    /// Upstream that only accepts the PDF procedures as POST
    async fn pdf_upstream() -> String {
        let app = Router::new()
            .route("/trpc/pdfReports.ttbForm", post(pdf_payload))
            .route("/trpc/pdfReports.purchaseReceipt", post(pdf_payload));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{}/trpc", addr)
    }

    #[tokio::test]
    async fn test_pdf_reports_are_posted_and_never_cached() {
        let mut config = Config::for_tests();
        config.rpc.base_url = pdf_upstream().await;
        let rpc = Arc::new(RpcClient::new(&config.rpc, &config.cache).unwrap());
        let service = DocumentService::new(rpc.clone());

        let form = service.ttb_form_pdf(&ReportingPeriod::annual(2024)).await.unwrap();
        assert_eq!(form.bytes, b"%PDF-1.7");
        assert_eq!(form.filename, "report.pdf");

        let receipt = service.purchase_receipt_pdf(Uuid::new_v4()).await.unwrap();
        assert_eq!(receipt.bytes, b"%PDF-1.7");

        assert_eq!(rpc.cached_queries().await, 0);
    }

    #[test]
    fn test_decode_pdf_payload() {
        let payload = PdfPayload {
            data: STANDARD.encode(b"%PDF-1.4"),
            filename: None,
        };
        let doc = PdfDocument::decode(payload, "report.pdf").unwrap();
        assert_eq!(doc.bytes, b"%PDF-1.4");
        assert_eq!(doc.content_disposition(), "attachment; filename=\"report.pdf\"");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let payload = PdfPayload {
            data: "not base64!".to_string(),
            filename: Some("x.pdf".to_string()),
        };
        assert!(matches!(
            PdfDocument::decode(payload, "report.pdf"),
            Err(AppError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_preview_rounds_lines() {
        let totals = Waterfall {
            opening: Decimal::new(100_126, 3),
            production: Decimal::from(50),
            losses: Decimal::from(5),
            sales: Decimal::from(20),
            distillation: Decimal::ZERO,
            ending: Decimal::new(125_126, 3),
        };
        let summary = ReconciliationSummary {
            period: ReportingPeriod::annual(2024),
            totals,
            identity_check: Decimal::ZERO,
            is_finalized: false,
            batches: vec![BatchReconciliation {
                batch_id: Uuid::new_v4(),
                waterfall: totals,
                identity_check: Decimal::ZERO,
                drift_liters: Decimal::from(2),
                initial_volume_anomaly: false,
                vessel_capacity_exceeded: false,
            }],
        };

        let preview = TtbFormPreview::build(&summary);
        assert_eq!(preview.period_label, "2024");
        assert_eq!(preview.lines[0].wine_gallons, Decimal::new(10013, 2));
        assert_eq!(preview.lines[5].wine_gallons, Decimal::new(12513, 2));
        assert!(preview.identity.passed);
        assert_eq!(preview.batch_count, 1);
        assert_eq!(preview.batches_with_issues, 1);
    }
}
