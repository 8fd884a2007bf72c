//! API types for price quotes and swap execution
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::serialization::u256_option_string_serialization;

// --------------
// | Api Routes |
// --------------

/// The route to fetch a price quote for the configured asset pair
///
/// Expected query parameters (all optional, defaults come from the server
/// configuration):
/// - quantity: The amount of the outgoing asset to sell, in its smallest unit
/// - slippageBps: Slippage tolerance in basis points (e.g. 300 for 3%)
pub const GET_QUOTE_ROUTE: &str = "quote";
/// The route to resolve a price, encode a take-order instruction, and simulate
/// its dispatch through the vault
///
/// Accepts the same query parameters as the quote route, plus:
/// - minIncomingAmount: The minimum acceptable amount of the incoming asset.
///   Defaults to the server-configured value; a value of 0 accepts any nonzero
///   output
pub const EXECUTE_SWAP_ROUTE: &str = "swap";

// -------------
// | Api Types |
// -------------

/// Query parameters accepted by the quote and swap endpoints
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapParams {
    /// The amount of the outgoing asset to sell, in its smallest unit
    #[serde(default, with = "u256_option_string_serialization")]
    pub quantity: Option<U256>,
    /// The slippage tolerance in basis points
    pub slippage_bps: Option<u16>,
    /// The minimum acceptable amount of the incoming asset, in its smallest
    /// unit. Zero accepts unlimited slippage
    #[serde(default, with = "u256_option_string_serialization")]
    pub min_incoming_amount: Option<U256>,
}

/// The outcome of a price resolution attempt, as reported to API consumers
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiQuote {
    /// The venue that produced the quote
    pub venue: String,
    /// The quote status, `OK` or `ERROR`
    pub status: String,
    /// The quoted amount of the incoming asset, in its smallest unit
    #[serde(default, with = "u256_option_string_serialization")]
    pub amount: Option<U256>,
    /// The unit price, in whole incoming units per whole outgoing unit
    pub price: Option<f64>,
    /// A human-readable description of the chosen route
    pub best_route: Option<String>,
    /// The ordered hop tokens of the chosen route
    pub path: Option<Vec<Address>>,
    /// The fee tiers of the route's concentrated-liquidity pools, in hop order
    pub pool_fees: Option<Vec<u32>>,
    /// The failure reason, populated only on error
    pub reason: Option<String>,
}

/// The response body for the swap endpoint
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapResponse {
    /// The quote the order was built from
    pub quote: ApiQuote,
    /// Whether the extension call simulated successfully
    pub simulated: bool,
    /// The raw return data of a successful simulation, hex-encoded
    pub return_data: Option<String>,
    /// The decoded failure reason, populated when the pipeline halted or the
    /// simulation reverted
    pub failure_reason: Option<String>,
}
