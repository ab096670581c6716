//! Cidery Management Platform - Backend Server
//!
//! Serves the cidery's reconciliation, cellar, purchasing and inventory
//! workflows on top of the upstream RPC API.

use axum::{routing::get, Router};
use shared::reconciliation::AutoVerifyTracker;
use std::{net::SocketAddr, sync::Arc};
use tokio::sync::Mutex;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod routes;
mod services;

pub use config::Config;

use external::RpcClient;
use services::transfer::PendingBlends;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub rpc: Arc<RpcClient>,
    pub auto_verify: Arc<Mutex<AutoVerifyTracker>>,
    pub pending_blends: PendingBlends,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> error::AppResult<Self> {
        let rpc = RpcClient::new(&config.rpc, &config.cache)?;
        Ok(Self {
            rpc: Arc::new(rpc),
            auto_verify: Arc::new(Mutex::new(AutoVerifyTracker::new())),
            pending_blends: PendingBlends::default(),
            config: Arc::new(config),
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cidery_server=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Cidery Management Server");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("RPC API: {}", config.rpc.base_url);

    let host: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::new(host, config.server.port);

    // Create application state
    let state = AppState::new(config)?;

    // Build application
    let app = create_app(state);

    // Start server
    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Cidery Management Platform API v1.0"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
