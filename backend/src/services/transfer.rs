//! Transfer service: checks vessel-to-vessel transfers and runs the blend
//! confirmation workflow
//!
//! A transfer into a vessel that already holds liquid is parked under a
//! confirmation token until the user confirms the blend. Confirmation is
//! advisory: if the transfer fails afterwards nothing is rolled back and the
//! user submits again.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use shared::VesselLiquid;
use shared::transfer::{
    check_transfer, ConfirmedTransfer, TransferCheck, TransferError, TransferRequest,
    TransferWorkflow,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::external::RpcClient;
use crate::services::VesselService;

/// How long a blend waits for confirmation
pub const BLEND_CONFIRMATION_TTL: Duration = Duration::from_secs(10 * 60);

const TRANSFER_GROUPS: &[&str] = &["vessel.", "batch.", "ttb."];

pub struct PendingBlend {
    workflow: TransferWorkflow,
    created_at: Instant,
}

/// Blends awaiting confirmation, keyed by confirmation token
pub type PendingBlends = Arc<RwLock<HashMap<Uuid, PendingBlend>>>;

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TransferOutcome {
    Completed {
        transfer: serde_json::Value,
    },
    #[serde(rename_all = "camelCase")]
    ConfirmationRequired {
        confirmation_token: Uuid,
        destination_batch_name: Option<String>,
        check: TransferCheck,
    },
}

impl From<TransferError> for AppError {
    fn from(e: TransferError) -> Self {
        match e {
            TransferError::Blocked(message) => AppError::ValidationError(message),
            TransferError::VolumeOutOfRange => AppError::Validation {
                field: "transferVolume".to_string(),
                message: TransferError::VolumeOutOfRange.to_string(),
            },
            other => AppError::InvalidStateTransition(other.to_string()),
        }
    }
}

#[derive(Clone)]
pub struct TransferService {
    rpc: Arc<RpcClient>,
    vessels: VesselService,
    pending: PendingBlends,
}

impl TransferService {
    pub fn new(rpc: Arc<RpcClient>, pending: PendingBlends) -> Self {
        Self {
            vessels: VesselService::new(rpc.clone()),
            rpc,
            pending,
        }
    }

    async fn endpoints(&self, request: &TransferRequest) -> AppResult<(VesselLiquid, VesselLiquid)> {
        let map = self.vessels.liquid_map().await?;
        let find = |id: Uuid| {
            map.iter()
                .find(|v| v.vessel.id == id)
                .cloned()
                .ok_or_else(|| AppError::NotFound(format!("Vessel {}", id)))
        };
        Ok((find(request.source_vessel_id)?, find(request.destination_vessel_id)?))
    }

    /// Run the transfer checks without submitting anything
    pub async fn check(&self, request: &TransferRequest) -> AppResult<TransferCheck> {
        let (source, destination) = self.endpoints(request).await?;
        Ok(check_transfer(&source, &destination, request))
    }

    pub async fn submit(&self, request: TransferRequest) -> AppResult<TransferOutcome> {
        let (source, destination) = self.endpoints(&request).await?;
        let check = check_transfer(&source, &destination, &request);

        let workflow = TransferWorkflow::new(request)
            .submit(&check, &destination)
            .map_err(|e| AppError::from(e).titled("Transfer failed"))?;

        match workflow {
            TransferWorkflow::Committed(confirmed) => self.execute(&confirmed).await,
            pending @ TransferWorkflow::PendingConfirmation { .. } => {
                let destination_batch_name = destination.batch_name.clone();
                let token = self.park(pending).await;
                tracing::info!(%token, "Transfer awaiting blend confirmation");
                Ok(TransferOutcome::ConfirmationRequired {
                    confirmation_token: token,
                    destination_batch_name,
                    check,
                })
            }
            TransferWorkflow::Draft(_) => Err(AppError::Internal(
                "transfer workflow stayed in draft after submit".to_string(),
            )),
        }
    }

    /// Confirm a parked blend and run the transfer
    pub async fn confirm(&self, token: Uuid) -> AppResult<TransferOutcome> {
        let workflow = self.take(token).await?;
        let committed = workflow
            .confirm()
            .map_err(|e| AppError::from(e).titled("Transfer failed"))?;
        match committed.committed() {
            Some(confirmed) => self.execute(confirmed).await,
            None => Err(AppError::Internal(
                "blend confirmation did not commit".to_string(),
            )),
        }
    }

    /// Drop a parked blend
    pub async fn cancel(&self, token: Uuid) -> AppResult<()> {
        self.take(token).await.map(|_| ())
    }

    async fn park(&self, workflow: TransferWorkflow) -> Uuid {
        let token = Uuid::new_v4();
        let mut pending = self.pending.write().await;
        pending.retain(|_, p| p.created_at.elapsed() <= BLEND_CONFIRMATION_TTL);
        pending.insert(
            token,
            PendingBlend {
                workflow,
                created_at: Instant::now(),
            },
        );
        token
    }

    async fn take(&self, token: Uuid) -> AppResult<TransferWorkflow> {
        let entry = self.pending.write().await.remove(&token);
        match entry {
            Some(p) if p.created_at.elapsed() <= BLEND_CONFIRMATION_TTL => Ok(p.workflow),
            _ => Err(AppError::Conflict {
                resource: "confirmation_token".to_string(),
                message: "This blend confirmation has expired or was already used".to_string(),
            }
            .titled("Transfer failed")),
        }
    }

    async fn execute(&self, confirmed: &ConfirmedTransfer) -> AppResult<TransferOutcome> {
        let transfer: serde_json::Value = self
            .rpc
            .mutate("vessel.transfer", confirmed, TRANSFER_GROUPS)
            .await
            .map_err(|e| e.titled("Transfer failed"))?;
        tracing::info!(
            source = %confirmed.source_vessel_id(),
            destination = %confirmed.destination_vessel_id(),
            volume_liters = %confirmed.volume_liters(),
            blend = confirmed.blend_confirmed(),
            "Transfer completed"
        );
        Ok(TransferOutcome::Completed { transfer })
    }
}
