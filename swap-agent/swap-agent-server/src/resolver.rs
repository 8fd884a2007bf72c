//! Price discovery through the routing oracle
//!
//! Resolution never raises past its boundary: every outcome, success or
//! failure, is expressed as a [`Quote`] value.

use std::{fmt::Display, sync::Arc, time::Duration};

use alloy_primitives::{Address, U256};
use swap_agent_api::ApiQuote;
use tokio::time::timeout;
use tracing::{instrument, warn};

use crate::{
    assets::{Asset, AssetRegistry},
    error::{SwapAgentError, SwapAgentResult},
    routing_client::{
        api_types::{RouteData, RouteRequest, TokenDescriptor},
        RoutingOracle,
    },
};

// -------------
// | Constants |
// -------------

/// The default slippage tolerance, in basis points
pub const DEFAULT_SLIPPAGE_BPS: u16 = 300;
/// The separator between hop symbols in a route description
const ROUTE_SEPARATOR: &str = " > ";
/// The protocol family routes are restricted to
const PROTOCOL_FAMILY: &str = "v3";

// ---------
// | Types |
// ---------

/// An enum used to specify supported pricing venues
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Venue {
    /// The Uniswap V3 venue
    UniswapV3,
}

impl Display for Venue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Venue::UniswapV3 => write!(f, "UniswapV3"),
        }
    }
}

/// The status of a price resolution attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuoteStatus {
    /// The attempt produced a usable price
    Ok,
    /// The attempt failed
    Error,
}

impl Display for QuoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuoteStatus::Ok => write!(f, "OK"),
            QuoteStatus::Error => write!(f, "ERROR"),
        }
    }
}

/// A concentrated-liquidity pool along a route
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolDescriptor {
    /// The pool's fee tier, in hundredths of a basis point
    pub fee: u32,
}

/// The normalized result of a price resolution attempt
///
/// Exactly one of the success fields or the failure reason is populated,
/// discriminated by `status`; values are only built through [`Quote::ok`]
/// and [`Quote::error`].
#[derive(Clone, Debug)]
pub struct Quote {
    /// The venue that produced the quote
    pub venue: Venue,
    /// The status of the resolution attempt
    pub status: QuoteStatus,
    /// The quoted output amount, in the incoming asset's smallest unit
    pub amount: Option<U256>,
    /// The unit price, in whole incoming units per whole outgoing unit
    pub price: Option<f64>,
    /// A human-readable description of the chosen route
    pub best_route: Option<String>,
    /// The ordered hop tokens of the chosen route
    pub path: Option<Vec<Address>>,
    /// The route's concentrated-liquidity pools, in hop order
    ///
    /// Constant-product hops are dropped here while remaining present in
    /// `path`; the encoder rejects routes where the two diverge.
    pub pools: Option<Vec<PoolDescriptor>>,
    /// The failure reason, populated only on error
    pub reason: Option<String>,
}

impl Quote {
    /// Build a successful quote
    fn ok(
        venue: Venue,
        amount: U256,
        price: f64,
        best_route: String,
        path: Vec<Address>,
        pools: Vec<PoolDescriptor>,
    ) -> Self {
        Self {
            venue,
            status: QuoteStatus::Ok,
            amount: Some(amount),
            price: Some(price),
            best_route: Some(best_route),
            path: Some(path),
            pools: Some(pools),
            reason: None,
        }
    }

    /// Build a failure quote
    fn error<T: ToString>(venue: Venue, reason: T) -> Self {
        Self {
            venue,
            status: QuoteStatus::Error,
            amount: None,
            price: None,
            best_route: None,
            path: None,
            pools: None,
            reason: Some(reason.to_string()),
        }
    }

    /// Whether the resolution attempt succeeded
    pub fn is_ok(&self) -> bool {
        self.status == QuoteStatus::Ok
    }
}

impl From<Quote> for ApiQuote {
    fn from(quote: Quote) -> Self {
        ApiQuote {
            venue: quote.venue.to_string(),
            status: quote.status.to_string(),
            amount: quote.amount,
            price: quote.price,
            best_route: quote.best_route,
            path: quote.path,
            pool_fees: quote.pools.map(|pools| pools.iter().map(|pool| pool.fee).collect()),
            reason: quote.reason,
        }
    }
}

// ------------
// | Resolver |
// ------------

/// Resolves prices for asset pairs through the routing oracle
#[derive(Clone)]
pub struct PriceResolver {
    /// The static asset registry of the target deployment
    registry: Arc<AssetRegistry>,
    /// The routing oracle
    oracle: Arc<dyn RoutingOracle + Send + Sync>,
    /// The deadline applied to oracle requests
    oracle_deadline: Duration,
}

impl PriceResolver {
    /// Create a new resolver
    pub fn new(
        registry: Arc<AssetRegistry>,
        oracle: Arc<dyn RoutingOracle + Send + Sync>,
        oracle_deadline: Duration,
    ) -> Self {
        Self { registry, oracle, oracle_deadline }
    }

    /// Resolve the best price for selling `quantity` atoms of the outgoing
    /// asset into the incoming asset
    #[instrument(skip(self))]
    pub async fn resolve_price(
        &self,
        incoming: Address,
        outgoing: Address,
        quantity: U256,
        slippage_bps: u16,
    ) -> Quote {
        match self.try_resolve(incoming, outgoing, quantity, slippage_bps).await {
            Ok(quote) => quote,
            Err(e) => {
                warn!("price resolution failed: {e}");
                Quote::error(Venue::UniswapV3, failure_reason(&e))
            },
        }
    }

    /// The fallible body of price resolution
    async fn try_resolve(
        &self,
        incoming: Address,
        outgoing: Address,
        quantity: U256,
        slippage_bps: u16,
    ) -> SwapAgentResult<Quote> {
        if incoming == outgoing {
            return Err(SwapAgentError::identical_assets(format!(
                "{incoming:#x} on both sides of the trade"
            )));
        }

        let incoming_asset = self.registry.get_primitive(&incoming)?;
        let outgoing_asset = self.registry.get_primitive(&outgoing)?;

        let request = RouteRequest {
            chain_id: self.registry.chain_id(),
            input_token: TokenDescriptor {
                address: outgoing_asset.address,
                decimals: outgoing_asset.decimals,
            },
            output_token: TokenDescriptor {
                address: incoming_asset.address,
                decimals: incoming_asset.decimals,
            },
            amount: quantity,
            recipient: self.registry.contracts().integration_manager,
            slippage_bps,
            protocols: PROTOCOL_FAMILY.to_string(),
        };

        let route = timeout(self.oracle_deadline, self.oracle.best_route(request))
            .await
            .map_err(|_| SwapAgentError::timeout("routing oracle request timed out"))??
            .ok_or_else(|| SwapAgentError::no_route("no viable path"))?;

        self.normalize_route(&route, incoming_asset, outgoing_asset, quantity)
    }

    /// Normalize an oracle route into a quote
    fn normalize_route(
        &self,
        route: &RouteData,
        incoming_asset: &Asset,
        outgoing_asset: &Asset,
        quantity: U256,
    ) -> SwapAgentResult<Quote> {
        let amount = route.quoted_amount()?;
        let output_decimal = incoming_asset.to_decimal(amount)?;
        let input_decimal = outgoing_asset.to_decimal(quantity)?;
        let price = output_decimal / input_decimal;

        let mut path = Vec::with_capacity(route.hops().len());
        let mut symbols = Vec::with_capacity(route.hops().len());
        for hop in route.hops() {
            let address = hop.address()?;
            symbols.push(self.registry.preferred_symbol(&address, hop.symbol()));
            path.push(address);
        }
        let best_route = symbols.join(ROUTE_SEPARATOR);

        let pools = route
            .pools()
            .iter()
            .filter_map(|pool| pool.fee_tier().map(|fee| PoolDescriptor { fee }))
            .collect();

        Ok(Quote::ok(Venue::UniswapV3, amount, price, best_route, path, pools))
    }
}

/// Map a resolution error to a user-facing failure reason
fn failure_reason(err: &SwapAgentError) -> &'static str {
    match err {
        SwapAgentError::NoRoute(_) => "No route found",
        SwapAgentError::IdenticalAssets(_) => "Assets are identical",
        _ => "No price",
    }
}
