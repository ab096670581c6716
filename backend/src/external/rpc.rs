//! Client for the upstream RPC API
//!
//! Queries are `GET {base}/{procedure}?input={json}`, mutations are
//! `POST {base}/{procedure}` with a JSON body. Both answer with
//! `{"result":{"data":...}}` or `{"error":{"message":...}}`.
//! Query results are cached per key; each mutation names the procedure
//! groups it invalidates.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;

use super::query_cache::{query_key, QueryCache};
use crate::config::{CacheConfig, RpcConfig};
use crate::error::{AppError, AppResult};

/// RPC API client
pub struct RpcClient {
    client: Client,
    base_url: String,
    api_token: Option<String>,
    cache: Mutex<QueryCache>,
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    result: Option<RpcResult>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcResult {
    #[serde(default)]
    data: Value,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    message: String,
}

/// Unwrap a response body into its `data`, or the upstream error message
pub fn parse_envelope(procedure: &str, success: bool, body: &str) -> AppResult<Value> {
    let envelope: RpcEnvelope = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(_) if !success => {
            return Err(AppError::UpstreamUnavailable(format!(
                "{} returned a non-RPC error: {}",
                procedure,
                body.chars().take(200).collect::<String>()
            )))
        }
        Err(e) => {
            return Err(AppError::InvalidResponse(format!(
                "{}: {}",
                procedure, e
            )))
        }
    };

    if let Some(error) = envelope.error {
        return Err(AppError::Rpc {
            procedure: procedure.to_string(),
            message: error.message,
        });
    }

    match envelope.result {
        Some(result) => Ok(result.data),
        None => Err(AppError::InvalidResponse(format!(
            "{}: response has neither result nor error",
            procedure
        ))),
    }
}

impl RpcClient {
    pub fn new(rpc: &RpcConfig, cache: &CacheConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(rpc.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: rpc.base_url.trim_end_matches('/').to_string(),
            api_token: rpc.api_token.clone(),
            cache: Mutex::new(QueryCache::new(
                Duration::from_secs(cache.ttl_secs),
                cache.max_entries,
            )),
        })
    }

    fn url(&self, procedure: &str) -> String {
        format!("{}/{}", self.base_url, procedure)
    }

    async fn send(&self, procedure: &str, request: RequestBuilder) -> AppResult<Value> {
        let request = match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(|e| {
            tracing::warn!(procedure, "RPC request failed: {}", e);
            AppError::UpstreamUnavailable(format!("{}: {}", procedure, e))
        })?;

        let success = response.status().is_success();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::UpstreamUnavailable(format!("{}: {}", procedure, e)))?;

        parse_envelope(procedure, success, &body)
    }

    /// Run a query, serving it from the cache while fresh
    pub async fn query<I, O>(&self, procedure: &str, input: &I) -> AppResult<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let input_json = serde_json::to_string(input)
            .map_err(|e| AppError::Internal(format!("Failed to encode RPC input: {}", e)))?;
        let key = query_key(procedure, &input_json);

        if let Some(cached) = self.cache.lock().await.get(&key) {
            tracing::debug!(procedure, "query cache hit");
            return Ok(serde_json::from_value(cached)?);
        }

        tracing::debug!(procedure, "RPC query");
        let request = self
            .client
            .get(self.url(procedure))
            .query(&[("input", input_json.as_str())]);
        let data = self.send(procedure, request).await?;

        self.cache.lock().await.insert(key, data.clone());
        Ok(serde_json::from_value(data)?)
    }

    /// Run a mutation, then drop cached queries for every group in
    /// `invalidates` (e.g. `"vessel."`). Nothing is invalidated on failure.
    pub async fn mutate<I, O>(&self, procedure: &str, input: &I, invalidates: &[&str]) -> AppResult<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        tracing::info!(procedure, "RPC mutation");
        let request = self.client.post(self.url(procedure)).json(input);
        let data = self.send(procedure, request).await?;

        let mut cache = self.cache.lock().await;
        for prefix in invalidates {
            let dropped = cache.invalidate_prefix(prefix);
            if dropped > 0 {
                tracing::debug!(procedure, prefix, dropped, "invalidated cached queries");
            }
        }
        drop(cache);

        Ok(serde_json::from_value(data)?)
    }

    /// Drop every cached query
    pub async fn invalidate_all(&self) {
        self.cache.lock().await.clear();
    }

    pub async fn cached_queries(&self) -> usize {
        self.cache.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_result_envelope() {
        let data = parse_envelope("vendor.list", true, r#"{"result":{"data":[{"id":1}]}}"#).unwrap();
        assert_eq!(data, json!([{"id": 1}]));
    }

    #[test]
    fn test_parse_null_data() {
        let data = parse_envelope("vendor.delete", true, r#"{"result":{}}"#).unwrap();
        assert_eq!(data, Value::Null);
    }

    #[test]
    fn test_parse_error_envelope_keeps_message() {
        let err = parse_envelope(
            "vessel.transfer",
            false,
            r#"{"error":{"message":"Destination vessel is under maintenance","code":-32600}}"#,
        )
        .unwrap_err();
        match err {
            AppError::Rpc { procedure, message } => {
                assert_eq!(procedure, "vessel.transfer");
                assert_eq!(message, "Destination vessel is under maintenance");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_non_json_failure_is_unavailable() {
        let err = parse_envelope("vessel.list", false, "<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, AppError::UpstreamUnavailable(_)));
    }

    #[test]
    fn test_non_json_success_is_invalid() {
        let err = parse_envelope("vessel.list", true, "ok").unwrap_err();
        assert!(matches!(err, AppError::InvalidResponse(_)));
    }
}
