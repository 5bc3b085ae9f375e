//! Typed bindings for the two consumed contracts.
//!
//! The staking contract runs two pools side by side: the default pool
//! (`stakeTokens`/`unstakeTokens`/`defaultAPY`) and the custom pool
//! (`customStaking`/`customUnstake`/`customAPY`), with separate balances and
//! reward rates. Reward payout is `claimTst`, shared by both pools.

use alloy::sol;

sol! {
    /// ERC-20 surface of the stake token consumed by the engine.
    contract StakeToken {
        function balanceOf(address owner) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }

    /// Two-pool staking contract.
    contract TokenStaking {
        function stakeTokens(uint256 amount) external;
        function customStaking(uint256 amount) external;
        function unstakeTokens() external;
        function customUnstake() external;
        function stakingBalance(address account) external view returns (uint256);
        function customStakingBalance(address account) external view returns (uint256);
        function totalStaked() external view returns (uint256);
        function customTotalStaked() external view returns (uint256);
        function defaultAPY() external view returns (uint256);
        function customAPY() external view returns (uint256);
        function redistributeRewards() external;
        function customRewards() external;
        function claimTst() external;
    }
}
