//! Dispatch boundary toward the vault's extension-call entry point
//!
//! The agent simulates the extension call rather than broadcasting it:
//! submission, gas estimation, and transaction management stay outside the
//! pipeline. Failures are surfaced with any revert payload the node supplied
//! so the caller can attempt to decode a reason.

use std::time::Duration;

use alloy::{
    network::TransactionBuilder,
    providers::{DynProvider, Provider},
    rpc::types::TransactionRequest,
    transports::TransportError,
};
use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;
use tokio::time::timeout;
use tracing::instrument;

use crate::encoder::{abi::IComptroller, IntegrationCallEnvelope, CALL_ON_INTEGRATION_ACTION_ID};

/// A failure returned by the ledger dispatch boundary
#[derive(Clone, Debug)]
pub enum DispatchError {
    /// The node rejected the call
    Rejected {
        /// The raw revert payload, when the node supplied one
        data: Option<String>,
        /// The node's human-readable message
        message: Option<String>,
    },
    /// The call did not complete before the configured deadline
    Timeout,
}

/// A client for dispatching integration calls through a vault's comptroller
#[derive(Clone)]
pub struct VaultClient {
    /// The RPC provider
    provider: DynProvider,
    /// The vault's comptroller proxy
    comptroller: Address,
    /// The vault's integration manager extension
    integration_manager: Address,
    /// The deadline applied to ledger calls
    call_deadline: Duration,
}

impl VaultClient {
    /// Create a new client
    pub fn new(
        provider: DynProvider,
        comptroller: Address,
        integration_manager: Address,
        call_deadline: Duration,
    ) -> Self {
        Self { provider, comptroller, integration_manager, call_deadline }
    }

    /// Build the extension-call calldata for an envelope
    fn call_on_extension_calldata(&self, envelope: &IntegrationCallEnvelope) -> Bytes {
        let call = IComptroller::callOnExtensionCall {
            _extension: self.integration_manager,
            _actionId: U256::from(CALL_ON_INTEGRATION_ACTION_ID),
            _callArgs: envelope.encode(),
        };

        Bytes::from(call.abi_encode())
    }

    /// Simulate dispatching an envelope through the comptroller's
    /// extension-call entry point
    #[instrument(skip_all)]
    pub async fn call_on_extension(
        &self,
        envelope: &IntegrationCallEnvelope,
    ) -> Result<Bytes, DispatchError> {
        let calldata = self.call_on_extension_calldata(envelope);
        let tx = TransactionRequest::default().with_to(self.comptroller).with_input(calldata);

        let call = async { self.provider.call(tx).await };
        match timeout(self.call_deadline, call).await {
            Ok(Ok(return_data)) => Ok(return_data),
            Ok(Err(e)) => Err(dispatch_error(e)),
            Err(_) => Err(DispatchError::Timeout),
        }
    }
}

/// Convert a transport error into a dispatch failure, keeping any revert
/// payload the node attached
fn dispatch_error(err: TransportError) -> DispatchError {
    match err.as_error_resp() {
        Some(payload) => DispatchError::Rejected {
            data: payload.data.as_ref().map(|raw| raw.get().trim_matches('"').to_string()),
            message: Some(payload.message.to_string()),
        },
        None => DispatchError::Rejected { data: None, message: Some(err.to_string()) },
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::FixedBytes;
    use alloy_sol_types::SolValue;

    use super::*;
    use crate::encoder::TAKE_ORDER_SELECTOR;

    /// Test that the extension-call calldata decodes back into its parts
    #[test]
    fn test_call_on_extension_calldata() {
        let integration_manager = Address::from([0x11; 20]);
        let adapter = Address::from([0x22; 20]);
        let comptroller = Address::from([0x33; 20]);

        let envelope = IntegrationCallEnvelope {
            adapter,
            selector: FixedBytes::from(TAKE_ORDER_SELECTOR),
            encoded_call_args: Bytes::from(vec![0xde, 0xad, 0xbe, 0xef]),
        };

        let provider = alloy::providers::ProviderBuilder::new()
            .connect_http("http://localhost:8545".parse().unwrap())
            .erased();
        let client = VaultClient::new(
            provider,
            comptroller,
            integration_manager,
            Duration::from_secs(1),
        );

        let calldata = client.call_on_extension_calldata(&envelope);
        let call = IComptroller::callOnExtensionCall::abi_decode(&calldata).unwrap();

        assert_eq!(call._extension, integration_manager);
        assert_eq!(call._actionId, U256::from(CALL_ON_INTEGRATION_ACTION_ID));

        let (decoded_adapter, selector, args) =
            <(Address, FixedBytes<4>, Bytes)>::abi_decode_params(&call._callArgs).unwrap();
        assert_eq!(decoded_adapter, adapter);
        assert_eq!(selector, FixedBytes::from(TAKE_ORDER_SELECTOR));
        assert_eq!(args, Bytes::from(vec![0xde, 0xad, 0xbe, 0xef]));
    }
}
