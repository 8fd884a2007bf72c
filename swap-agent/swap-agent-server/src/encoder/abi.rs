//! ABI types for the vault's extension-call surface

use alloy::sol;

sol! {
    /// The vault comptroller's extension-call entry point
    contract IComptroller {
        function callOnExtension(address _extension, uint256 _actionId, bytes _callArgs) external;
    }

    /// The adapter interface the integration manager dispatches take orders to
    contract IIntegrationAdapter {
        function takeOrder(address _vaultProxy, bytes _orderData, bytes _assetData) external;
    }
}
