//! Routing service API type definitions

use alloy_primitives::{Address, U256};
use serde::Deserialize;

use crate::error::{SwapAgentError, SwapAgentResult};

/// A canonical token descriptor sent to the routing service
#[derive(Clone, Copy, Debug)]
pub struct TokenDescriptor {
    /// The token contract address
    pub address: Address,
    /// The token's decimal precision
    pub decimals: u8,
}

/// A request for the best exact-input route between two tokens
#[derive(Clone, Debug)]
pub struct RouteRequest {
    /// The chain on which the trade executes
    pub chain_id: u64,
    /// The token being sold
    pub input_token: TokenDescriptor,
    /// The token being bought
    pub output_token: TokenDescriptor,
    /// The exact input amount, in the input token's smallest unit
    pub amount: U256,
    /// The recipient of the trade's output
    pub recipient: Address,
    /// The slippage tolerance, in basis points
    pub slippage_bps: u16,
    /// The protocol family the route is restricted to
    pub protocols: String,
}

impl RouteRequest {
    /// Render the request as query parameters for the route endpoint
    pub(crate) fn to_query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("chainId", self.chain_id.to_string()),
            ("tokenIn", format!("{:#x}", self.input_token.address)),
            ("tokenInDecimals", self.input_token.decimals.to_string()),
            ("tokenOut", format!("{:#x}", self.output_token.address)),
            ("tokenOutDecimals", self.output_token.decimals.to_string()),
            ("amount", self.amount.to_string()),
            ("recipient", format!("{:#x}", self.recipient)),
            ("slippageBps", self.slippage_bps.to_string()),
            ("protocols", self.protocols.clone()),
        ]
    }
}

/// Raw response structure from the routing service
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResponse {
    /// The best route, absent when no viable path exists
    route: Option<RouteData>,
}

impl RouteResponse {
    /// Unwrap the route, if any
    pub fn into_route(self) -> Option<RouteData> {
        self.route
    }
}

/// A single route returned by the routing service
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteData {
    /// The quoted output amount, in the output token's smallest unit
    amount_out: String,
    /// The ordered hop tokens of the route
    path: Vec<RouteHopToken>,
    /// The ordered liquidity pools of the route, one per hop
    pools: Vec<RoutePool>,
}

impl RouteData {
    /// Get the quoted output amount
    pub fn quoted_amount(&self) -> SwapAgentResult<U256> {
        U256::from_str_radix(&self.amount_out, 10).map_err(SwapAgentError::parse)
    }

    /// Get the ordered hop tokens of the route
    pub fn hops(&self) -> &[RouteHopToken] {
        &self.path
    }

    /// Get the ordered liquidity pools of the route
    pub fn pools(&self) -> &[RoutePool] {
        &self.pools
    }
}

/// A hop token within a route
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteHopToken {
    /// The token contract address
    address: String,
    /// The token symbol, as known to the routing service
    symbol: Option<String>,
}

impl RouteHopToken {
    /// Get the token's address
    pub fn address(&self) -> SwapAgentResult<Address> {
        self.address.parse().map_err(SwapAgentError::parse)
    }

    /// Get the token's symbol, as known to the routing service
    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }
}

/// A liquidity pool within a route
///
/// Concentrated-liquidity pools carry a fee tier; constant-product pairs
/// do not.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePool {
    /// The pool's fee tier, in hundredths of a basis point
    fee: Option<u32>,
}

impl RoutePool {
    /// Get the pool's fee tier, `None` for constant-product pairs
    pub fn fee_tier(&self) -> Option<u32> {
        self.fee
    }
}
