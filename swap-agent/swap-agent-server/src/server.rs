//! Defines the server which encapsulates all dependencies for swap agent
//! execution

use std::{error::Error, sync::Arc, time::Duration};

use alloy_primitives::{Address, U256};

use crate::{
    assets::AssetRegistry,
    gas::GasOracleClient,
    helpers::build_provider,
    resolver::PriceResolver,
    routing_client::RoutingClient,
    vault_client::VaultClient,
    Cli,
};

/// The defaults applied to requests that omit parameters
#[derive(Clone, Debug)]
pub(crate) struct SwapDefaults {
    /// The address of the asset the vault receives
    pub incoming_asset: Address,
    /// The address of the asset the vault sells
    pub outgoing_asset: Address,
    /// The amount of the outgoing asset to sell, in its smallest unit
    pub quantity: U256,
    /// The slippage tolerance, in basis points
    pub slippage_bps: u16,
    /// The minimum acceptable amount of the incoming asset, in its smallest
    /// unit. Zero accepts unlimited slippage
    pub min_incoming_amount: U256,
}

/// The server
#[derive(Clone)]
pub(crate) struct Server {
    /// The static asset registry of the target deployment
    pub registry: Arc<AssetRegistry>,
    /// The price resolver
    pub resolver: PriceResolver,
    /// The vault dispatch client
    pub vault_client: VaultClient,
    /// The gas oracle client
    pub gas_oracle: GasOracleClient,
    /// The defaults for swap requests
    pub swap_defaults: SwapDefaults,
}

impl Server {
    /// Build a server from the CLI
    pub async fn build_from_cli(args: Cli) -> Result<Self, Box<dyn Error>> {
        let registry = Arc::new(AssetRegistry::from_json_file(&args.asset_registry_path)?);

        // Fail at startup on an unknown or non-primitive pair rather than on
        // the first request
        let incoming_asset: Address = args.incoming_asset.parse()?;
        let outgoing_asset: Address = args.outgoing_asset.parse()?;
        registry.get_primitive(&incoming_asset)?;
        registry.get_primitive(&outgoing_asset)?;

        let routing_client = RoutingClient::new(args.routing_api_url, args.routing_api_key);
        let resolver = PriceResolver::new(
            registry.clone(),
            Arc::new(routing_client),
            Duration::from_millis(args.oracle_timeout_ms),
        );

        let provider = build_provider(&args.rpc_url)?;
        let comptroller: Address = args.comptroller_address.parse()?;
        let vault_client = VaultClient::new(
            provider,
            comptroller,
            registry.contracts().integration_manager,
            Duration::from_millis(args.call_timeout_ms),
        );

        let gas_oracle = GasOracleClient::new(args.gas_station_url);

        let swap_defaults = SwapDefaults {
            incoming_asset,
            outgoing_asset,
            quantity: U256::from_str_radix(&args.quantity, 10)?,
            slippage_bps: args.slippage_bps,
            min_incoming_amount: U256::from_str_radix(&args.min_incoming_amount, 10)?,
        };

        Ok(Self { registry, resolver, vault_client, gas_oracle, swap_defaults })
    }
}
