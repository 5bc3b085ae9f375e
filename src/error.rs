//! Engine-wide error taxonomy.
//!
//! Three classes with distinct propagation rules:
//! - validation errors (`InvalidAmount`, `TransactionInProgress`) are rejected
//!   locally before any ledger call
//! - configuration errors (`NetworkMismatch`, `ContractNotDeployed`) and
//!   provider-setup errors are terminal for the current session; the engine
//!   goes non-operational until reconnect
//! - transactional errors (`UserRejected`, `TransactionReverted`,
//!   `ProviderError`) terminate the current sequence and release the in-flight
//!   lock; the engine never auto-retries a financial transaction

use thiserror::Error;

use crate::contracts::ContractId;

/// Errors surfaced by the staking engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The wallet provider could not be reached or set up.
    #[error("wallet provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The provider exposed no account.
    #[error("no account exposed by the wallet provider")]
    NoAccount,

    /// The provider's active network no longer matches the session identity.
    #[error("connected network {actual} does not match session network {expected}")]
    NetworkMismatch { expected: u64, actual: u64 },

    /// No deployment entry for this contract on the active network.
    #[error("{contract} contract is not deployed on network {network_id}")]
    ContractNotDeployed { contract: ContractId, network_id: u64 },

    /// The supplied amount is not a valid transaction amount.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// The signer declined to authorize the transaction.
    #[error("transaction rejected by the signer")]
    UserRejected,

    /// The transaction was mined but reverted on-chain.
    #[error("transaction reverted: {0}")]
    TransactionReverted(String),

    /// RPC transport or node-side failure.
    #[error("provider error: {0}")]
    ProviderError(String),

    /// Another transaction sequence has not reached a terminal state yet.
    #[error("a transaction is already in flight")]
    TransactionInProgress,
}

impl EngineError {
    /// True for conditions that leave the engine non-operational until the
    /// user reconnects or switches network.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            EngineError::ProviderUnavailable(_)
                | EngineError::NoAccount
                | EngineError::NetworkMismatch { .. }
                | EngineError::ContractNotDeployed { .. }
        )
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
