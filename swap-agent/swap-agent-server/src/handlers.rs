//! Handlers for the swap agent endpoints

use std::sync::Arc;

use swap_agent_api::{ApiQuote, GasPriceResponse, SwapParams, SwapResponse};
use tracing::{error, instrument};
use warp::reply::Json;

use crate::{
    encoder::{IntegrationCallEnvelope, TakeOrderArgs},
    error::ApiError,
    resolver::Quote,
    revert::decode_revert,
    server::Server,
    vault_client::DispatchError,
};

/// The failure reason reported when a dispatch error carries no detail at all
const GENERIC_DISPATCH_FAILURE: &str = "The call failed without providing further details.";
/// The failure reason reported when the ledger call hits its deadline
const DISPATCH_TIMEOUT_FAILURE: &str = "The ledger call timed out before completing.";

/// Handler for resolving a price quote for the configured pair
#[instrument(skip_all)]
pub(crate) async fn get_quote_handler(
    params: SwapParams,
    server: Arc<Server>,
) -> Result<Json, warp::Rejection> {
    let quote = resolve_with_defaults(&params, &server).await;
    Ok(warp::reply::json(&ApiQuote::from(quote)))
}

/// Handler for resolving a price, encoding a take order, and simulating its
/// dispatch through the vault
#[instrument(skip_all)]
pub(crate) async fn execute_swap_handler(
    params: SwapParams,
    server: Arc<Server>,
) -> Result<Json, warp::Rejection> {
    let defaults = &server.swap_defaults;
    let quantity = params.quantity.unwrap_or(defaults.quantity);
    let min_incoming = params.min_incoming_amount.unwrap_or(defaults.min_incoming_amount);

    // Price discovery; a failed quote halts the pipeline before encoding
    let quote = resolve_with_defaults(&params, &server).await;
    if !quote.is_ok() {
        let reason = quote.reason.clone();
        return Ok(warp::reply::json(&SwapResponse {
            quote: quote.into(),
            simulated: false,
            return_data: None,
            failure_reason: reason,
        }));
    }

    // Encode the take order and wrap it into the integration-call envelope
    let args = TakeOrderArgs::from_quote(&quote, min_incoming, quantity)
        .map_err(|e| warp::reject::custom(ApiError::BadRequest(e.to_string())))?;
    let adapter = server.registry.contracts().uniswap_v3_adapter;
    let envelope = IntegrationCallEnvelope::take_order(adapter, &args)
        .map_err(|e| warp::reject::custom(ApiError::InternalError(e.to_string())))?;

    // Simulate the dispatch, decoding a revert reason on failure
    let (simulated, return_data, failure_reason) =
        match server.vault_client.call_on_extension(&envelope).await {
            Ok(data) => (true, Some(format!("{data}")), None),
            Err(e) => {
                error!("swap dispatch failed: {e:?}");
                (false, None, Some(dispatch_failure_reason(e)))
            },
        };

    Ok(warp::reply::json(&SwapResponse {
        quote: quote.into(),
        simulated,
        return_data,
        failure_reason,
    }))
}

/// Handler for fetching the current fast gas price
#[instrument(skip_all)]
pub(crate) async fn gas_price_handler(server: Arc<Server>) -> Result<Json, warp::Rejection> {
    let gas_price_wei = server
        .gas_oracle
        .fetch_fast_gas_price()
        .await
        .map_err(|e| warp::reject::custom(ApiError::InternalError(e.to_string())))?;

    Ok(warp::reply::json(&GasPriceResponse { gas_price_wei }))
}

// -----------
// | Helpers |
// -----------

/// Resolve a price using the configured defaults for any missing parameters
async fn resolve_with_defaults(params: &SwapParams, server: &Server) -> Quote {
    let defaults = &server.swap_defaults;
    let quantity = params.quantity.unwrap_or(defaults.quantity);
    let slippage_bps = params.slippage_bps.unwrap_or(defaults.slippage_bps);

    server
        .resolver
        .resolve_price(defaults.incoming_asset, defaults.outgoing_asset, quantity, slippage_bps)
        .await
}

/// Decode a dispatch failure into a human-readable reason, preferring the
/// revert payload over the node's message
fn dispatch_failure_reason(err: DispatchError) -> String {
    match err {
        DispatchError::Rejected { data: Some(data), .. } => decode_revert(&data),
        DispatchError::Rejected { message: Some(message), .. } => message,
        DispatchError::Rejected { .. } => GENERIC_DISPATCH_FAILURE.to_string(),
        DispatchError::Timeout => DISPATCH_TIMEOUT_FAILURE.to_string(),
    }
}
