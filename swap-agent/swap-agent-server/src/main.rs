//! The swap agent: resolves the best price for a configured asset pair
//! through an external routing service, encodes the route into a take-order
//! instruction, and simulates its dispatch through a vault's extension-call
//! mechanism
#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]
#![deny(unsafe_code)]

pub mod assets;
pub mod encoder;
pub mod error;
pub mod gas;
pub mod handlers;
pub mod helpers;
pub mod resolver;
pub mod revert;
pub mod routing_client;
pub mod server;
pub mod vault_client;

use std::{error::Error, sync::Arc};

use clap::Parser;
use swap_agent_api::{
    SwapParams, EXECUTE_SWAP_ROUTE, GAS_PRICE_ROUTE, GET_QUOTE_ROUTE, PING_ROUTE,
};
use tracing_subscriber::EnvFilter;
use warp::Filter;

use crate::{
    error::handle_rejection,
    handlers::{execute_swap_handler, gas_price_handler, get_quote_handler},
    server::Server,
};

// -------
// | Cli |
// -------

/// The cli for the swap agent
#[rustfmt::skip]
#[derive(Parser)]
#[clap(about = "Swap agent server")]
struct Cli {
    // --- Environment Configs --- //

    /// The path to the asset registry file for the target deployment
    #[clap(long, env = "ASSET_REGISTRY_PATH")]
    asset_registry_path: String,
    /// The address of the vault's comptroller proxy
    #[clap(long, env = "COMPTROLLER_ADDRESS")]
    comptroller_address: String,
    /// The address of the asset the vault receives
    #[clap(long, env = "INCOMING_ASSET")]
    incoming_asset: String,
    /// The address of the asset the vault sells
    #[clap(long, env = "OUTGOING_ASSET")]
    outgoing_asset: String,

    // --- Swap Defaults --- //

    /// The default amount of the outgoing asset to sell, in its smallest unit
    #[clap(long, default_value = "100000", env = "SWAP_QUANTITY")]
    quantity: String,
    /// The default slippage tolerance, in basis points
    #[clap(long, default_value_t = resolver::DEFAULT_SLIPPAGE_BPS, env = "SLIPPAGE_BPS")]
    slippage_bps: u16,
    /// The default minimum acceptable amount of the incoming asset, in its
    /// smallest unit
    ///
    /// The default of 0 accepts unlimited slippage: any nonzero output
    /// satisfies the order
    #[clap(long, default_value = "0", env = "MIN_INCOMING_AMOUNT")]
    min_incoming_amount: String,

    // --- External Services --- //

    /// The RPC url to use
    #[clap(short, long, env = "RPC_URL")]
    rpc_url: String,
    /// The routing service base url
    #[clap(long, env = "ROUTING_API_URL")]
    routing_api_url: String,
    /// The routing service api key
    #[clap(long, env = "ROUTING_API_KEY")]
    routing_api_key: Option<String>,
    /// The gas station url
    #[clap(
        long,
        default_value = "https://gasstation-mainnet.matic.network/v2",
        env = "GAS_STATION_URL"
    )]
    gas_station_url: String,

    // --- Timeouts --- //

    /// The deadline for routing oracle requests, in milliseconds
    #[clap(long, default_value = "10000", env = "ORACLE_TIMEOUT_MS")]
    oracle_timeout_ms: u64,
    /// The deadline for ledger calls, in milliseconds
    #[clap(long, default_value = "15000", env = "CALL_TIMEOUT_MS")]
    call_timeout_ms: u64,

    // --- Server Config --- //

    /// The port to run the server on
    #[clap(long, default_value = "3000")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let port = cli.port; // copy `cli.port` to use after moving `cli`
    let server = Server::build_from_cli(cli).await.expect("failed to build server");

    // ----------
    // | Routes |
    // ----------

    let server = Arc::new(server);
    let ping = warp::get()
        .and(warp::path(PING_ROUTE))
        .map(|| warp::reply::with_status("PONG", warp::http::StatusCode::OK));

    let get_quote = warp::get()
        .and(warp::path(GET_QUOTE_ROUTE))
        .and(warp::query::<SwapParams>())
        .and(with_server(server.clone()))
        .and_then(get_quote_handler);

    let execute_swap = warp::get()
        .and(warp::path(EXECUTE_SWAP_ROUTE))
        .and(warp::query::<SwapParams>())
        .and(with_server(server.clone()))
        .and_then(execute_swap_handler);

    let gas_price = warp::get()
        .and(warp::path(GAS_PRICE_ROUTE))
        .and(with_server(server.clone()))
        .and_then(gas_price_handler);

    let routes = ping.or(get_quote).or(execute_swap).or(gas_price).recover(handle_rejection);
    warp::serve(routes).run(([0, 0, 0, 0], port)).await;

    Ok(())
}

// -----------
// | Helpers |
// -----------

/// Helper function to clone and pass the server to filters
fn with_server(
    server: Arc<Server>,
) -> impl Filter<Extract = (Arc<Server>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || server.clone())
}
