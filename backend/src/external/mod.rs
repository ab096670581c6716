//! External API integrations

pub mod query_cache;
pub mod rpc;

pub use query_cache::QueryCache;
pub use rpc::RpcClient;
