//! Published state value types.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::mode::StakeMode;

/// Connected account and network, fixed for one connection cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub address: Address,
    pub network_id: u64,
    pub network_name: String,
}

/// One staking pool as seen by the connected account.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PoolState {
    /// This account's stake in the pool.
    pub my_stake: Amount,
    /// Everyone's stake in the pool.
    pub total_staked: Amount,
    /// Annualized reward rate, percent.
    pub apy: f64,
}

/// Both pools. Each is independent; nothing reads or writes across them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pools {
    pub standard: PoolState,
    pub custom: PoolState,
}

impl Pools {
    pub fn pool(&self, mode: StakeMode) -> &PoolState {
        match mode {
            StakeMode::Standard => &self.standard,
            StakeMode::Custom => &self.custom,
        }
    }
}

/// The complete on-chain view held by the client.
///
/// Produced atomically by the synchronizer and replaced wholesale; consumers
/// never observe a partially updated snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub identity: Identity,
    /// The account's liquid token balance.
    pub token_balance: Amount,
    /// Token balance held by the staking contract itself.
    pub contract_balance: Amount,
    pub pools: Pools,
}
