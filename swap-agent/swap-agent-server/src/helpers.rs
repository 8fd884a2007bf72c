//! Helpers for the swap agent server

use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use reqwest::Response;
use serde::Deserialize;

use crate::error::{SwapAgentError, SwapAgentResult};

/// Build an HTTP provider for the given RPC url
pub fn build_provider(rpc_url: &str) -> SwapAgentResult<DynProvider> {
    let url = rpc_url.parse().map_err(SwapAgentError::parse)?;
    Ok(ProviderBuilder::new().connect_http(url).erased())
}

/// Deserialize a JSON response body, surfacing non-success statuses as errors
pub async fn handle_http_response<T: for<'de> Deserialize<'de>>(
    response: Response,
) -> SwapAgentResult<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SwapAgentError::http(format!("{status}: {body}")));
    }

    response.json::<T>().await.map_err(SwapAgentError::http)
}
