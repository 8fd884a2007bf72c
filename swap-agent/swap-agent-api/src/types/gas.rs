//! API types for gas price queries
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::serialization::u256_string_serialization;

/// The route to fetch the current fast gas price from the gas oracle
pub const GAS_PRICE_ROUTE: &str = "gas-price";

/// The response body for the gas price endpoint
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasPriceResponse {
    /// The fast gas price, in wei
    #[serde(with = "u256_string_serialization")]
    pub gas_price_wei: U256,
}
