//! Encoding of take-order instructions and integration-call envelopes
//!
//! A successful quote is turned into the adapter's binary take-order format,
//! then wrapped into the generic envelope the vault's extension mechanism
//! consumes. Both transforms are pure and deterministic.

pub mod abi;

use alloy_primitives::{aliases::U24, Address, Bytes, FixedBytes, U256};
use alloy_sol_types::{SolCall, SolValue};

use crate::{
    encoder::abi::IIntegrationAdapter,
    error::{SwapAgentError, SwapAgentResult},
    resolver::Quote,
};

/// The selector of the adapter's take-order action
pub const TAKE_ORDER_SELECTOR: [u8; 4] = IIntegrationAdapter::takeOrderCall::SELECTOR;

/// The integration manager action id for calling an integration
pub const CALL_ON_INTEGRATION_ACTION_ID: u64 = 0;

/// The arguments of a take-order instruction for the Uniswap V3 adapter
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TakeOrderArgs {
    /// The minimum acceptable amount of the incoming asset, in its smallest
    /// unit. Zero accepts unlimited slippage
    pub min_incoming_amount: U256,
    /// The exact amount of the outgoing asset being sold, in its smallest
    /// unit
    pub outgoing_amount: U256,
    /// The ordered hop token addresses of the route
    pub path_addresses: Vec<Address>,
    /// The fee tiers of the route's pools, one per hop
    pub path_fees: Vec<u32>,
}

impl TakeOrderArgs {
    /// Build take-order args from a successful quote
    ///
    /// A route mixing pool kinds cannot be expressed in the adapter's path
    /// format: its filtered fee-tier list no longer corresponds positionally
    /// to the hop list, so such routes are rejected here instead of being
    /// encoded with misaligned fees.
    pub fn from_quote(
        quote: &Quote,
        min_incoming_amount: U256,
        outgoing_amount: U256,
    ) -> SwapAgentResult<Self> {
        if !quote.is_ok() {
            return Err(SwapAgentError::custom("cannot build an order from a failed quote"));
        }

        let path_addresses =
            quote.path.clone().ok_or_else(|| SwapAgentError::parse("quote has no path"))?;
        let pools =
            quote.pools.clone().ok_or_else(|| SwapAgentError::parse("quote has no pools"))?;

        if pools.len() + 1 != path_addresses.len() {
            return Err(SwapAgentError::unsupported_route(format!(
                "route mixes pool kinds: {} hops but {} fee tiers",
                path_addresses.len().saturating_sub(1),
                pools.len(),
            )));
        }

        let path_fees = pools.iter().map(|pool| pool.fee).collect();
        Ok(Self { min_incoming_amount, outgoing_amount, path_addresses, path_fees })
    }

    /// ABI encode the args in the adapter's layout:
    /// `(address[] pathAddresses, uint24[] pathFees,
    /// uint256 outgoingAssetAmount, uint256 minIncomingAssetAmount)`
    pub fn encode(&self) -> SwapAgentResult<Bytes> {
        let fees = self
            .path_fees
            .iter()
            .map(|&fee| U24::try_from(fee).map_err(SwapAgentError::parse))
            .collect::<SwapAgentResult<Vec<U24>>>()?;

        let encoded = (
            self.path_addresses.clone(),
            fees,
            self.outgoing_amount,
            self.min_incoming_amount,
        )
            .abi_encode_params();

        Ok(Bytes::from(encoded))
    }
}

/// A generic envelope directing the vault's extension mechanism at a specific
/// adapter action
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntegrationCallEnvelope {
    /// The adapter to invoke
    pub adapter: Address,
    /// The selector of the adapter action
    pub selector: FixedBytes<4>,
    /// The encoded arguments of the adapter action
    pub encoded_call_args: Bytes,
}

impl IntegrationCallEnvelope {
    /// Build a take-order envelope for the given adapter
    pub fn take_order(adapter: Address, args: &TakeOrderArgs) -> SwapAgentResult<Self> {
        Ok(Self {
            adapter,
            selector: FixedBytes::from(TAKE_ORDER_SELECTOR),
            encoded_call_args: args.encode()?,
        })
    }

    /// ABI encode the envelope for submission through the extension-call
    /// entry point: `(address adapter, bytes4 selector, bytes callArgs)`
    pub fn encode(&self) -> Bytes {
        let encoded =
            (self.adapter, self.selector, self.encoded_call_args.clone()).abi_encode_params();
        Bytes::from(encoded)
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::keccak256;

    use super::*;
    use crate::resolver::{PoolDescriptor, Quote, QuoteStatus, Venue};

    /// Build a successful two-hop quote
    fn two_hop_quote() -> Quote {
        Quote {
            venue: Venue::UniswapV3,
            status: QuoteStatus::Ok,
            amount: Some(U256::from(99_500u64)),
            price: Some(0.995),
            best_route: Some("USDC > WMATIC > WETH".to_string()),
            path: Some(vec![
                Address::from([0xbb; 20]),
                Address::from([0xcc; 20]),
                Address::from([0xaa; 20]),
            ]),
            pools: Some(vec![PoolDescriptor { fee: 500 }, PoolDescriptor { fee: 3000 }]),
            reason: None,
        }
    }

    /// Test that the take-order selector matches its signature hash
    #[test]
    fn test_take_order_selector() {
        let hash = keccak256("takeOrder(address,bytes,bytes)".as_bytes());
        assert_eq!(TAKE_ORDER_SELECTOR, hash[..4]);
    }

    /// Test building args from a quote with aligned path and pool lists
    #[test]
    fn test_from_quote() {
        let quote = two_hop_quote();
        let args = TakeOrderArgs::from_quote(&quote, U256::ZERO, U256::from(100_000u64)).unwrap();

        assert_eq!(args.path_addresses.len(), 3);
        assert_eq!(args.path_fees, vec![500, 3000]);
        assert_eq!(args.outgoing_amount, U256::from(100_000u64));
        assert_eq!(args.min_incoming_amount, U256::ZERO);
    }

    /// Test that a mixed route, whose filtered pool list no longer matches
    /// its path, is rejected
    #[test]
    fn test_mixed_route_rejected() {
        let mut quote = two_hop_quote();
        quote.pools = Some(vec![PoolDescriptor { fee: 500 }]);

        let result = TakeOrderArgs::from_quote(&quote, U256::ZERO, U256::from(100_000u64));
        assert!(matches!(result, Err(SwapAgentError::UnsupportedRoute(_))));
    }

    /// Test that a failed quote cannot be encoded
    #[test]
    fn test_failed_quote_rejected() {
        let mut quote = two_hop_quote();
        quote.status = QuoteStatus::Error;

        let result = TakeOrderArgs::from_quote(&quote, U256::ZERO, U256::from(100_000u64));
        assert!(result.is_err());
    }

    /// Test that the encoded args round-trip through the adapter's layout
    #[test]
    fn test_args_encoding_round_trip() {
        let quote = two_hop_quote();
        let args = TakeOrderArgs::from_quote(&quote, U256::from(1u64), U256::from(100_000u64))
            .unwrap();
        let encoded = args.encode().unwrap();

        let (path, fees, outgoing, min_incoming) =
            <(Vec<Address>, Vec<U24>, U256, U256)>::abi_decode_params(&encoded).unwrap();

        assert_eq!(path, args.path_addresses);
        assert_eq!(fees, vec![U24::from(500u32), U24::from(3000u32)]);
        assert_eq!(outgoing, U256::from(100_000u64));
        assert_eq!(min_incoming, U256::from(1u64));
    }

    /// Test that encoding is deterministic
    #[test]
    fn test_encoding_deterministic() {
        let quote = two_hop_quote();
        let args = TakeOrderArgs::from_quote(&quote, U256::ZERO, U256::from(100_000u64)).unwrap();

        assert_eq!(args.encode().unwrap(), args.encode().unwrap());
    }

    /// Test that the envelope round-trips through its layout
    #[test]
    fn test_envelope_encoding_round_trip() {
        let quote = two_hop_quote();
        let args = TakeOrderArgs::from_quote(&quote, U256::ZERO, U256::from(100_000u64)).unwrap();
        let adapter = Address::from([0x22; 20]);

        let envelope = IntegrationCallEnvelope::take_order(adapter, &args).unwrap();
        let encoded = envelope.encode();

        let (decoded_adapter, selector, call_args) =
            <(Address, FixedBytes<4>, Bytes)>::abi_decode_params(&encoded).unwrap();

        assert_eq!(decoded_adapter, adapter);
        assert_eq!(selector, FixedBytes::from(TAKE_ORDER_SELECTOR));
        assert_eq!(call_args, args.encode().unwrap());
    }
}
