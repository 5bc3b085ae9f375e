//! Mode-parameterized routing of commands to ledger entry points.
//!
//! One table maps every (mode, action) pair to its contract call, so an
//! action cannot gain a standard-pool entry point without its custom-pool
//! counterpart being decided in the same place.

use alloy::primitives::U256;
use alloy::sol_types::SolCall;

use crate::contracts::abi::TokenStaking;
use crate::contracts::ContractId;
use crate::mode::StakeMode;

/// A staking command to be routed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StakeAction {
    Stake(U256),
    Unstake,
    Claim,
    Redistribute,
}

impl StakeAction {
    pub fn name(&self) -> &'static str {
        match self {
            StakeAction::Stake(_) => "stake",
            StakeAction::Unstake => "unstake",
            StakeAction::Claim => "claim",
            StakeAction::Redistribute => "redistribute",
        }
    }
}

/// A resolved ledger entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    pub contract: ContractId,
    pub calldata: Vec<u8>,
}

/// The complete mode/action routing table.
pub fn entry_point(mode: StakeMode, action: &StakeAction) -> EntryPoint {
    let calldata = match (mode, action) {
        (StakeMode::Standard, StakeAction::Stake(amount)) => {
            TokenStaking::stakeTokensCall { amount: *amount }.abi_encode()
        }
        (StakeMode::Custom, StakeAction::Stake(amount)) => {
            TokenStaking::customStakingCall { amount: *amount }.abi_encode()
        }
        (StakeMode::Standard, StakeAction::Unstake) => {
            TokenStaking::unstakeTokensCall {}.abi_encode()
        }
        (StakeMode::Custom, StakeAction::Unstake) => TokenStaking::customUnstakeCall {}.abi_encode(),
        (StakeMode::Standard, StakeAction::Redistribute) => {
            TokenStaking::redistributeRewardsCall {}.abi_encode()
        }
        (StakeMode::Custom, StakeAction::Redistribute) => {
            TokenStaking::customRewardsCall {}.abi_encode()
        }
        // reward claiming is mode-agnostic on chain
        (_, StakeAction::Claim) => TokenStaking::claimTstCall {}.abi_encode(),
    };
    EntryPoint {
        contract: ContractId::Staking,
        calldata,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector(entry: &EntryPoint) -> [u8; 4] {
        [
            entry.calldata[0],
            entry.calldata[1],
            entry.calldata[2],
            entry.calldata[3],
        ]
    }

    #[test]
    fn test_modes_route_to_distinct_entry_points() {
        for action in [
            StakeAction::Stake(U256::from(1)),
            StakeAction::Unstake,
            StakeAction::Redistribute,
        ] {
            let standard = entry_point(StakeMode::Standard, &action);
            let custom = entry_point(StakeMode::Custom, &action);
            assert_ne!(
                selector(&standard),
                selector(&custom),
                "{} must use distinct pool entry points",
                action.name()
            );
        }
    }

    #[test]
    fn test_claim_is_mode_agnostic() {
        let standard = entry_point(StakeMode::Standard, &StakeAction::Claim);
        let custom = entry_point(StakeMode::Custom, &StakeAction::Claim);
        assert_eq!(standard, custom);
        assert_eq!(selector(&standard), TokenStaking::claimTstCall::SELECTOR);
    }

    #[test]
    fn test_stake_encodes_amount() {
        let entry = entry_point(StakeMode::Standard, &StakeAction::Stake(U256::from(42)));
        let call = TokenStaking::stakeTokensCall::abi_decode(&entry.calldata).unwrap();
        assert_eq!(call.amount, U256::from(42));
    }

    #[test]
    fn test_everything_targets_the_staking_contract() {
        for mode in [StakeMode::Standard, StakeMode::Custom] {
            for action in [
                StakeAction::Stake(U256::from(1)),
                StakeAction::Unstake,
                StakeAction::Claim,
                StakeAction::Redistribute,
            ] {
                assert_eq!(entry_point(mode, &action).contract, ContractId::Staking);
            }
        }
    }
}
