//! Snapshot assembly and publication.
//!
//! One refresh reads everything the engine publishes — balances, per-pool
//! stakes and totals, per-pool reward rates — and swaps the published
//! snapshot in a single step. A refresh that fails anywhere publishes
//! nothing: consumers keep seeing the previous snapshot.

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use alloy::sol_types::{SolCall, SolValue};
use arc_swap::ArcSwapOption;

use crate::amount::Amount;
use crate::chain::ChainConnector;
use crate::contracts::abi::{StakeToken, TokenStaking};
use crate::contracts::{ContractId, ContractRegistry};
use crate::error::{EngineError, EngineResult};
use crate::mode::StakeMode;
use crate::observability::metrics;
use crate::sync::snapshot::{EngineSnapshot, Identity, PoolState, Pools};

/// The contract reports a per-period rate scaled by 1000; annualized over
/// 365 periods. Both pools use the same formula over distinct raw rates.
const APY_RATE_DIVISOR: f64 = 1000.0;
const PERIODS_PER_YEAR: f64 = 365.0;

pub struct StateSynchronizer {
    connector: ChainConnector,
    registry: Arc<ContractRegistry>,
    published: ArcSwapOption<EngineSnapshot>,
}

impl StateSynchronizer {
    pub fn new(connector: ChainConnector, registry: Arc<ContractRegistry>) -> Self {
        Self {
            connector,
            registry,
            published: ArcSwapOption::empty(),
        }
    }

    /// The last successfully published snapshot, if any.
    pub fn snapshot(&self) -> Option<Arc<EngineSnapshot>> {
        self.published.load_full()
    }

    /// Pull a fresh snapshot and publish it atomically.
    ///
    /// Safe to call repeatedly and concurrently: each invocation assembles a
    /// complete snapshot locally before swapping it in.
    pub async fn refresh(&self, identity: &Identity) -> EngineResult<Arc<EngineSnapshot>> {
        match self.assemble(identity).await {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                self.published.store(Some(snapshot.clone()));
                metrics::record_refresh("ok");
                tracing::debug!(
                    network_id = identity.network_id,
                    token_balance = %snapshot.token_balance,
                    "Snapshot refreshed"
                );
                Ok(snapshot)
            }
            Err(e) => {
                metrics::record_refresh("error");
                tracing::warn!(error = %e, "Snapshot refresh failed, previous snapshot retained");
                Err(e)
            }
        }
    }

    async fn assemble(&self, identity: &Identity) -> EngineResult<EngineSnapshot> {
        let active = self.connector.chain_id().await?;
        if active != identity.network_id {
            return Err(EngineError::NetworkMismatch {
                expected: identity.network_id,
                actual: active,
            });
        }

        let token = self.registry.resolve(ContractId::Token, identity.network_id)?;
        let staking = self
            .registry
            .resolve(ContractId::Staking, identity.network_id)?;

        let token_balance = self.balance_of(token.address, identity.address).await?;
        let contract_balance = self.balance_of(token.address, staking.address).await?;
        let standard = self
            .pool_state(staking.address, identity.address, StakeMode::Standard)
            .await?;
        let custom = self
            .pool_state(staking.address, identity.address, StakeMode::Custom)
            .await?;

        Ok(EngineSnapshot {
            identity: identity.clone(),
            token_balance,
            contract_balance,
            pools: Pools { standard, custom },
        })
    }

    async fn balance_of(&self, token: Address, owner: Address) -> EngineResult<Amount> {
        let raw = self
            .read_u256(token, StakeToken::balanceOfCall { owner }.abi_encode())
            .await?;
        Ok(Amount::from_base_units(raw))
    }

    async fn pool_state(
        &self,
        staking: Address,
        account: Address,
        mode: StakeMode,
    ) -> EngineResult<PoolState> {
        let (stake_raw, total_raw, rate_raw) = match mode {
            StakeMode::Standard => (
                self.read_u256(
                    staking,
                    TokenStaking::stakingBalanceCall { account }.abi_encode(),
                )
                .await?,
                self.read_u256(staking, TokenStaking::totalStakedCall {}.abi_encode())
                    .await?,
                self.read_u256(staking, TokenStaking::defaultAPYCall {}.abi_encode())
                    .await?,
            ),
            StakeMode::Custom => (
                self.read_u256(
                    staking,
                    TokenStaking::customStakingBalanceCall { account }.abi_encode(),
                )
                .await?,
                self.read_u256(staking, TokenStaking::customTotalStakedCall {}.abi_encode())
                    .await?,
                self.read_u256(staking, TokenStaking::customAPYCall {}.abi_encode())
                    .await?,
            ),
        };

        Ok(PoolState {
            my_stake: Amount::from_base_units(stake_raw),
            total_staked: Amount::from_base_units(total_raw),
            apy: annualize(rate_raw),
        })
    }

    async fn read_u256(&self, to: Address, calldata: Vec<u8>) -> EngineResult<U256> {
        let raw = self.connector.call(to, calldata.into()).await?;
        U256::abi_decode(&raw)
            .map_err(|e| EngineError::ProviderError(format!("malformed contract return: {}", e)))
    }
}

fn annualize(raw_rate: U256) -> f64 {
    (raw_rate.saturating_to::<u64>() as f64) / APY_RATE_DIVISOR * PERIODS_PER_YEAR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annualization_formula() {
        // 274 per-period → 0.274 → ~100% per year
        assert!((annualize(U256::from(274)) - 100.01).abs() < 0.001);
        assert_eq!(annualize(U256::ZERO), 0.0);
        // both pools share the formula; doubling the raw rate doubles the APY
        assert_eq!(
            annualize(U256::from(548)),
            2.0 * annualize(U256::from(274))
        );
    }
}
