//! The ledger provider boundary.
//!
//! Everything the engine needs from a wallet provider fits in one trait:
//! account discovery, network identification, read-only contract calls, and
//! transaction submission with lifecycle events. The production implementation
//! is [`crate::chain::rpc::RpcLedger`]; tests script their own.

use alloy::primitives::{Address, Bytes, TxHash};
use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::{EngineError, EngineResult};

/// Lifecycle stage of a submitted transaction.
///
/// Stages arrive in strictly increasing order. `Receipt` is the durability
/// point; `Confirmed` re-signals it after the configured block depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TxStage {
    Submitted,
    Receipt,
    Confirmed,
}

/// One lifecycle notification for a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxEvent {
    pub stage: TxStage,
    pub tx_hash: TxHash,
}

/// Ordered, finite event feed for one transaction. Closes after `Confirmed`
/// or an error.
pub type TxEventStream = mpsc::Receiver<Result<TxEvent, EngineError>>;

/// Channel capacity: three stage events plus a terminal error.
pub const TX_EVENT_CAPACITY: usize = 4;

/// A transaction handed to the provider for signing and broadcast.
#[derive(Debug, Clone)]
pub struct TxSubmission {
    pub from: Address,
    pub to: Address,
    pub data: Bytes,
}

/// Wallet provider boundary.
#[async_trait]
pub trait LedgerProvider: Send + Sync {
    /// Accounts the provider is willing to sign for.
    async fn accounts(&self) -> EngineResult<Vec<Address>>;

    /// Chain id of the provider's active network.
    async fn chain_id(&self) -> EngineResult<u64>;

    /// Read-only contract call.
    async fn call(&self, to: Address, data: Bytes) -> EngineResult<Bytes>;

    /// Sign and broadcast a transaction.
    ///
    /// A submission-time refusal fails the call itself (`UserRejected`,
    /// `ProviderError`); afterwards the returned stream reports the
    /// transaction's fate.
    async fn submit(&self, tx: TxSubmission) -> EngineResult<TxEventStream>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_ordering() {
        assert!(TxStage::Submitted < TxStage::Receipt);
        assert!(TxStage::Receipt < TxStage::Confirmed);
    }
}
