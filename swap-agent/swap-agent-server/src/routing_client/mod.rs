//! Client for the external routing service used for price discovery

pub mod api_types;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::error;

use crate::{
    error::{SwapAgentError, SwapAgentResult},
    routing_client::api_types::{RouteData, RouteRequest, RouteResponse},
};

/// The routing service api key header
const API_KEY_HEADER: &str = "x-api-key";
/// The endpoint for requesting a route
const ROUTE_ENDPOINT: &str = "route";

/// The interface to the routing oracle
///
/// The resolver talks to the oracle through this trait so it can be exercised
/// against synthetic oracles in tests.
#[async_trait]
pub trait RoutingOracle {
    /// Request the best route for an exact-input trade
    ///
    /// Returns `None` when the oracle finds no viable path.
    async fn best_route(&self, request: RouteRequest) -> SwapAgentResult<Option<RouteData>>;
}

/// A client for the routing service's HTTP API
#[derive(Clone)]
pub struct RoutingClient {
    /// The API key to use for requests
    api_key: Option<String>,
    /// The base URL of the routing service
    base_url: String,
    /// The underlying HTTP client
    http_client: Arc<Client>,
}

impl RoutingClient {
    /// Create a new client
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self { api_key, base_url, http_client: Arc::new(Client::new()) }
    }

    /// Get a full URL for a given endpoint
    fn build_url(&self, endpoint: &str, params: &[(&str, String)]) -> SwapAgentResult<Url> {
        let url = if !endpoint.starts_with('/') {
            format!("{}/{}", self.base_url, endpoint)
        } else {
            format!("{}{}", self.base_url, endpoint)
        };

        Url::parse_with_params(&url, params).map_err(SwapAgentError::parse)
    }

    /// Send a get request to the routing service
    async fn send_get_request<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> SwapAgentResult<T> {
        let url = self.build_url(endpoint, params)?;

        // Add an API key if present
        let mut request = self.http_client.get(url);
        if let Some(api_key) = &self.api_key {
            request = request.header(API_KEY_HEADER, api_key.as_str());
        }

        request.send().await?.json::<T>().await.map_err(SwapAgentError::http)
    }
}

#[async_trait]
impl RoutingOracle for RoutingClient {
    /// Request the best route from the routing service
    async fn best_route(&self, request: RouteRequest) -> SwapAgentResult<Option<RouteData>> {
        let params = request.to_query_params();
        let resp: RouteResponse = match self.send_get_request(ROUTE_ENDPOINT, &params).await {
            Ok(resp) => resp,
            Err(e) => {
                error!("routing service error: {e}");
                return Err(e);
            },
        };

        Ok(resp.into_route())
    }
}
