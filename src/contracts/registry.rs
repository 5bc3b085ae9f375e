//! Per-network contract resolution.

use std::collections::HashMap;
use std::fmt;

use alloy::primitives::Address;

use crate::config::NetworkConfig;
use crate::error::{EngineError, EngineResult};

/// The two contracts the engine talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractId {
    Token,
    Staking,
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContractId::Token => "token",
            ContractId::Staking => "staking",
        })
    }
}

/// A contract resolved on a concrete network. The interface half of the
/// handle is the static binding in [`crate::contracts::abi`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractHandle {
    pub id: ContractId,
    pub address: Address,
}

#[derive(Debug, Clone, Copy)]
struct Deployment {
    token: Address,
    staking: Address,
}

/// Immutable deployment table keyed by network id.
///
/// Absence of an entry for the active network is a terminal configuration
/// error for that network, not a retryable fault.
#[derive(Debug, Clone, Default)]
pub struct ContractRegistry {
    deployments: HashMap<u64, Deployment>,
}

impl ContractRegistry {
    /// Build the table from validated configuration.
    pub fn from_config(networks: &[NetworkConfig]) -> Result<Self, String> {
        let mut deployments = HashMap::new();
        for network in networks {
            let token: Address = network
                .token_address
                .parse()
                .map_err(|e| format!("network {}: invalid token address: {}", network.id, e))?;
            let staking: Address = network
                .staking_address
                .parse()
                .map_err(|e| format!("network {}: invalid staking address: {}", network.id, e))?;
            deployments.insert(network.id, Deployment { token, staking });
        }
        Ok(Self { deployments })
    }

    /// Look up a contract on a network; fails closed when undeployed.
    pub fn resolve(&self, contract: ContractId, network_id: u64) -> EngineResult<ContractHandle> {
        let deployment =
            self.deployments
                .get(&network_id)
                .ok_or(EngineError::ContractNotDeployed {
                    contract,
                    network_id,
                })?;
        let address = match contract {
            ContractId::Token => deployment.token,
            ContractId::Staking => deployment.staking,
        };
        Ok(ContractHandle {
            id: contract,
            address,
        })
    }
}
