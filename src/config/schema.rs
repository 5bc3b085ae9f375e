//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML config files;
//! every field has a default so a minimal config stays valid.

use serde::{Deserialize, Serialize};

/// Root configuration for the staking engine.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Ledger provider settings (RPC endpoint, timeouts, confirmations).
    pub provider: ProviderConfig,

    /// Per-network contract deployment table.
    pub networks: Vec<NetworkConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Ledger provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Block depth at which a receipted transaction counts as confirmed.
    pub confirmation_blocks: u32,

    /// Receipt polling interval in milliseconds.
    pub receipt_poll_interval_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            rpc_timeout_secs: 10,
            confirmation_blocks: 3,
            receipt_poll_interval_ms: 2000,
        }
    }
}

/// Contract deployment entry for one network.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
    /// EVM chain id this entry covers.
    pub id: u64,

    /// Address of the stake token contract.
    pub token_address: String,

    /// Address of the staking contract.
    pub staking_address: String,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
