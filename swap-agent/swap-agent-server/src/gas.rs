//! Client for the chain's gas station endpoint
//!
//! A collaborator outside the core pipeline: broadcast is disabled, so its
//! result is only reported, never consumed. Unlike the resolver it re-raises
//! on fetch failure.

use alloy_primitives::U256;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::{SwapAgentError, SwapAgentResult},
    helpers::handle_http_response,
};

/// The number of wei in one gwei
const WEI_PER_GWEI: u64 = 1_000_000_000;

/// The gas station's response body
#[derive(Debug, Deserialize)]
struct GasStationResponse {
    /// The fast gas estimate tier
    fast: GasEstimate,
}

/// A single gas estimate tier
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GasEstimate {
    /// The maximum fee, in gwei
    max_fee: f64,
}

/// A client for the chain's gas station endpoint
#[derive(Clone)]
pub struct GasOracleClient {
    /// The gas station URL
    url: String,
    /// The underlying HTTP client
    http_client: Client,
}

impl GasOracleClient {
    /// Create a new client
    pub fn new(url: String) -> Self {
        Self { url, http_client: Client::new() }
    }

    /// Fetch the fast gas price, in wei
    pub async fn fetch_fast_gas_price(&self) -> SwapAgentResult<U256> {
        let response = self
            .http_client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| SwapAgentError::http(format!("Failed to fetch gas price data: {e}")))?;

        let body: GasStationResponse = handle_http_response(response).await?;
        Ok(gas_price_wei(body.fast.max_fee))
    }
}

/// Convert a gwei estimate into a wei amount, rounding the estimate up
fn gas_price_wei(max_fee_gwei: f64) -> U256 {
    U256::from(max_fee_gwei.ceil() as u64) * U256::from(WEI_PER_GWEI)
}
