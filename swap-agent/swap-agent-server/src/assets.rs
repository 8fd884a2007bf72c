//! The static asset registry for the target deployment
//!
//! The registry is loaded once at startup and passed explicitly to the
//! components that need it, keeping the pipeline testable with synthetic
//! registries.

use std::{collections::HashMap, fs, path::Path};

use alloy_primitives::{Address, U256};
use serde::Deserialize;

use crate::error::{SwapAgentError, SwapAgentResult};

/// The classification of an asset in the registry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    /// A directly-priceable asset
    Primitive,
    /// An asset whose value derives from other assets
    Derivative,
}

/// A single asset known to the target deployment
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// The asset's contract address
    pub address: Address,
    /// The asset's symbol
    pub symbol: String,
    /// The asset's decimal precision
    pub decimals: u8,
    /// The asset's classification
    pub kind: AssetKind,
}

impl Asset {
    /// Convert an amount in the asset's smallest unit into whole units
    pub fn to_decimal(&self, amount: U256) -> SwapAgentResult<f64> {
        let atoms: u128 = amount.try_into().map_err(SwapAgentError::parse)?;
        Ok(atoms as f64 / 10f64.powi(self.decimals as i32))
    }
}

/// The contract addresses of the target deployment
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentContracts {
    /// The vault's integration manager extension
    pub integration_manager: Address,
    /// The Uniswap V3 adapter registered with the integration manager
    pub uniswap_v3_adapter: Address,
}

/// The on-disk representation of the registry
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegistryFile {
    /// The chain id of the deployment
    chain_id: u64,
    /// The deployment's contract addresses
    contracts: DeploymentContracts,
    /// The assets known to the deployment
    assets: Vec<Asset>,
}

/// A static registry of assets and contracts for one deployment
#[derive(Clone, Debug)]
pub struct AssetRegistry {
    /// The chain id of the deployment
    chain_id: u64,
    /// The deployment's contract addresses
    contracts: DeploymentContracts,
    /// The assets known to the deployment, keyed by address
    assets: HashMap<Address, Asset>,
}

impl AssetRegistry {
    /// Create a registry from its parts
    pub fn new(chain_id: u64, contracts: DeploymentContracts, assets: Vec<Asset>) -> Self {
        let assets = assets.into_iter().map(|asset| (asset.address, asset)).collect();
        Self { chain_id, contracts, assets }
    }

    /// Load a registry from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> SwapAgentResult<Self> {
        let contents = fs::read_to_string(path).map_err(SwapAgentError::parse)?;
        let file: RegistryFile = serde_json::from_str(&contents).map_err(SwapAgentError::parse)?;
        Ok(Self::new(file.chain_id, file.contracts, file.assets))
    }

    /// The chain id of the deployment
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// The deployment's contract addresses
    pub fn contracts(&self) -> &DeploymentContracts {
        &self.contracts
    }

    /// Look up an asset by address
    pub fn get(&self, address: &Address) -> Option<&Asset> {
        self.assets.get(address)
    }

    /// Look up a primitive asset by address, erroring on unknown addresses
    /// and on assets of a different classification
    pub fn get_primitive(&self, address: &Address) -> SwapAgentResult<&Asset> {
        let asset = self
            .get(address)
            .ok_or_else(|| SwapAgentError::parse(format!("unknown asset: {address:#x}")))?;

        if asset.kind != AssetKind::Primitive {
            return Err(SwapAgentError::parse(format!("asset is not a primitive: {address:#x}")));
        }
        Ok(asset)
    }

    /// Resolve the preferred symbol for an address, favoring the registry's
    /// symbol over the one reported by an external service
    pub fn preferred_symbol(&self, address: &Address, fallback: Option<&str>) -> String {
        self.get(address)
            .map(|asset| asset.symbol.clone())
            .or_else(|| fallback.map(String::from))
            .unwrap_or_else(|| format!("{address:#x}"))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    /// Build a two-asset registry for testing
    fn test_registry() -> AssetRegistry {
        let contracts = DeploymentContracts {
            integration_manager: Address::from([0x11; 20]),
            uniswap_v3_adapter: Address::from([0x22; 20]),
        };
        let assets = vec![
            Asset {
                address: Address::from([0xaa; 20]),
                symbol: "USDC".to_string(),
                decimals: 6,
                kind: AssetKind::Primitive,
            },
            Asset {
                address: Address::from([0xbb; 20]),
                symbol: "cUSDC".to_string(),
                decimals: 8,
                kind: AssetKind::Derivative,
            },
        ];

        AssetRegistry::new(137, contracts, assets)
    }

    /// Test decimal correction of atom amounts
    #[test]
    fn test_to_decimal() {
        let registry = test_registry();
        let usdc = registry.get(&Address::from([0xaa; 20])).unwrap();

        let decimal = usdc.to_decimal(U256::from(100_000u64)).unwrap();
        assert!((decimal - 0.1).abs() < f64::EPSILON);
    }

    /// Test that primitive lookups reject derivatives and unknown addresses
    #[test]
    fn test_get_primitive() {
        let registry = test_registry();

        assert!(registry.get_primitive(&Address::from([0xaa; 20])).is_ok());
        assert!(registry.get_primitive(&Address::from([0xbb; 20])).is_err());
        assert!(registry.get_primitive(&Address::from([0xcc; 20])).is_err());
    }

    /// Test symbol preference: registry first, fallback second, address last
    #[test]
    fn test_preferred_symbol() {
        let registry = test_registry();
        let known = Address::from([0xaa; 20]);
        let unknown = Address::from([0xcc; 20]);

        assert_eq!(registry.preferred_symbol(&known, Some("USDC.e")), "USDC");
        assert_eq!(registry.preferred_symbol(&unknown, Some("WETH")), "WETH");
        assert_eq!(registry.preferred_symbol(&unknown, None), format!("{unknown:#x}"));
    }

    /// Test loading a registry from a JSON file
    #[test]
    fn test_from_json_file() {
        let contents = r#"{
            "chainId": 137,
            "contracts": {
                "integrationManager": "0x1111111111111111111111111111111111111111",
                "uniswapV3Adapter": "0x2222222222222222222222222222222222222222"
            },
            "assets": [
                {
                    "address": "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
                    "symbol": "USDC",
                    "decimals": 6,
                    "kind": "primitive"
                }
            ]
        }"#;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();

        let registry = AssetRegistry::from_json_file(file.path()).unwrap();
        assert_eq!(registry.chain_id(), 137);
        assert_eq!(registry.get(&Address::from([0xaa; 20])).unwrap().symbol, "USDC");
    }
}
