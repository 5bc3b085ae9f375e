//! Connection establishment and provider passthrough.

use std::sync::Arc;

use alloy::primitives::{Address, Bytes};

use crate::chain::provider::{LedgerProvider, TxEventStream, TxSubmission};
use crate::error::{EngineError, EngineResult};
use crate::sync::snapshot::Identity;

/// Human-readable name for well-known chain ids.
pub fn network_name(id: u64) -> &'static str {
    match id {
        1 => "mainnet",
        5 => "goerli",
        137 => "polygon",
        11155111 => "sepolia",
        1337 | 31337 => "development",
        _ => "unknown",
    }
}

/// Thin wrapper over the ledger provider. Stateless: every call reads the
/// provider directly, nothing is cached here.
#[derive(Clone)]
pub struct ChainConnector {
    provider: Arc<dyn LedgerProvider>,
}

impl ChainConnector {
    pub fn new(provider: Arc<dyn LedgerProvider>) -> Self {
        Self { provider }
    }

    /// Discover the account and network, producing the session identity.
    pub async fn connect(&self) -> EngineResult<Identity> {
        let accounts = self.provider.accounts().await?;
        let address = accounts.first().copied().ok_or(EngineError::NoAccount)?;
        let network_id = self.provider.chain_id().await?;

        let identity = Identity {
            address,
            network_id,
            network_name: network_name(network_id).to_string(),
        };
        tracing::info!(
            address = %identity.address,
            network_id = identity.network_id,
            network = %identity.network_name,
            "Connected to ledger"
        );
        Ok(identity)
    }

    /// Chain id of the provider's active network right now.
    pub async fn chain_id(&self) -> EngineResult<u64> {
        self.provider.chain_id().await
    }

    pub async fn call(&self, to: Address, data: Bytes) -> EngineResult<Bytes> {
        self.provider.call(to, data).await
    }

    pub async fn submit(&self, tx: TxSubmission) -> EngineResult<TxEventStream> {
        self.provider.submit(tx).await
    }
}

impl std::fmt::Debug for ChainConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainConnector").finish_non_exhaustive()
    }
}
