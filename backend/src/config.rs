//! Configuration management for the Cidery Management Platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with CIDERY_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Upstream RPC API configuration
    pub rpc: RpcConfig,

    /// Query cache configuration
    pub cache: CacheConfig,

    /// Reconciliation page behaviour
    pub reconciliation: ReconciliationConfig,

    /// Log output configuration
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RpcConfig {
    /// Base URL of the RPC API, e.g. `http://localhost:3001/trpc`
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Bearer token sent with every call
    pub api_token: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    /// How long a query result stays fresh
    pub ttl_secs: u64,

    /// Oldest entries are evicted past this size
    pub max_entries: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReconciliationConfig {
    /// Bulk-verify clean periods automatically
    pub auto_verify_enabled: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Emit JSON lines instead of human-readable logs
    pub json: bool,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("CIDERY_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("rpc.base_url", "http://localhost:3001/trpc")?
            .set_default("rpc.timeout_secs", 30)?
            .set_default("cache.ttl_secs", 30)?
            .set_default("cache.max_entries", 512)?
            .set_default("reconciliation.auto_verify_enabled", true)?
            .set_default("logging.json", false)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (CIDERY_ prefix)
            .add_source(
                Environment::with_prefix("CIDERY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

#[cfg(test)]
impl Config {
    /// Configuration for tests, pointing at an address nothing listens on
    pub fn for_tests() -> Self {
        Self {
            environment: "test".to_string(),
            server: ServerConfig::default(),
            rpc: RpcConfig {
                base_url: "http://127.0.0.1:9/trpc".to_string(),
                timeout_secs: 1,
                api_token: None,
            },
            cache: CacheConfig {
                ttl_secs: 30,
                max_entries: 16,
            },
            reconciliation: ReconciliationConfig {
                auto_verify_enabled: false,
            },
            logging: LoggingConfig { json: false },
        }
    }
}
