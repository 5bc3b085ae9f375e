//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the deployment table (parseable addresses, no duplicate networks)
//! - Validate value ranges (timeouts > 0, well-formed RPC URL)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: EngineConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use alloy::primitives::Address;

use crate::config::schema::EngineConfig;

/// A single semantic problem found in a config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    InvalidRpcUrl(String),
    ZeroTimeout,
    NoNetworks,
    DuplicateNetwork(u64),
    InvalidAddress {
        network_id: u64,
        field: &'static str,
        value: String,
    },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidRpcUrl(url) => write!(f, "invalid RPC URL '{}'", url),
            ValidationError::ZeroTimeout => write!(f, "rpc_timeout_secs must be greater than 0"),
            ValidationError::NoNetworks => write!(f, "no [[networks]] deployment entries"),
            ValidationError::DuplicateNetwork(id) => {
                write!(f, "duplicate [[networks]] entry for network {}", id)
            }
            ValidationError::InvalidAddress {
                network_id,
                field,
                value,
            } => write!(f, "network {}: invalid {} '{}'", network_id, field, value),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a parsed config, collecting every problem found.
pub fn validate_config(config: &EngineConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.provider.rpc_url.parse::<url::Url>().is_err() {
        errors.push(ValidationError::InvalidRpcUrl(
            config.provider.rpc_url.clone(),
        ));
    }
    if config.provider.rpc_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if config.networks.is_empty() {
        errors.push(ValidationError::NoNetworks);
    }
    let mut seen = std::collections::HashSet::new();
    for network in &config.networks {
        if !seen.insert(network.id) {
            errors.push(ValidationError::DuplicateNetwork(network.id));
        }
        if network.token_address.parse::<Address>().is_err() {
            errors.push(ValidationError::InvalidAddress {
                network_id: network.id,
                field: "token_address",
                value: network.token_address.clone(),
            });
        }
        if network.staking_address.parse::<Address>().is_err() {
            errors.push(ValidationError::InvalidAddress {
                network_id: network.id,
                field: "staking_address",
                value: network.staking_address.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
