//! JSON-RPC backed ledger provider.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint with a local signing wallet
//! - Serve read-only contract calls with timeouts
//! - Broadcast transactions and feed their lifecycle stages
//!   (Submitted → Receipt → Confirmed) from a receipt-polling task

use std::sync::Arc;
use std::time::Duration;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::{interval, timeout};

use crate::chain::provider::{
    LedgerProvider, TxEvent, TxEventStream, TxStage, TxSubmission, TX_EVENT_CAPACITY,
};
use crate::chain::wallet::Wallet;
use crate::config::ProviderConfig;
use crate::error::{EngineError, EngineResult};

/// Ledger provider over a JSON-RPC node, signing locally.
pub struct RpcLedger {
    provider: Arc<dyn Provider + Send + Sync>,
    sender: Address,
    timeout_duration: Duration,
    confirmation_blocks: u32,
    poll_interval: Duration,
}

impl RpcLedger {
    /// Create a ledger provider from config and a signing wallet.
    pub fn new(config: &ProviderConfig, wallet: Wallet) -> EngineResult<Self> {
        let rpc_url: url::Url = config.rpc_url.parse().map_err(|e| {
            EngineError::ProviderUnavailable(format!(
                "invalid RPC URL '{}': {}",
                config.rpc_url, e
            ))
        })?;

        let sender = wallet.address();
        let provider = ProviderBuilder::new()
            .wallet(wallet.into_signer())
            .connect_http(rpc_url);

        tracing::info!(
            rpc_url = %config.rpc_url,
            sender = %sender,
            confirmation_blocks = config.confirmation_blocks,
            "RPC ledger initialized"
        );

        Ok(Self {
            provider: Arc::new(provider) as Arc<dyn Provider + Send + Sync>,
            sender,
            timeout_duration: Duration::from_secs(config.rpc_timeout_secs),
            confirmation_blocks: config.confirmation_blocks,
            poll_interval: Duration::from_millis(config.receipt_poll_interval_ms),
        })
    }
}

#[async_trait]
impl LedgerProvider for RpcLedger {
    async fn accounts(&self) -> EngineResult<Vec<Address>> {
        // The local signer is the account source, the analog of an injected
        // browser wallet.
        Ok(vec![self.sender])
    }

    async fn chain_id(&self) -> EngineResult<u64> {
        match timeout(self.timeout_duration, self.provider.get_chain_id()).await {
            Ok(Ok(id)) => Ok(id),
            Ok(Err(e)) => Err(EngineError::ProviderError(format!(
                "eth_chainId failed: {}",
                e
            ))),
            Err(_) => Err(EngineError::ProviderError(format!(
                "eth_chainId timed out after {}s",
                self.timeout_duration.as_secs()
            ))),
        }
    }

    async fn call(&self, to: Address, data: Bytes) -> EngineResult<Bytes> {
        let request = TransactionRequest::default().with_to(to).with_input(data);
        match timeout(self.timeout_duration, self.provider.call(request)).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => Err(EngineError::ProviderError(format!("eth_call failed: {}", e))),
            Err(_) => Err(EngineError::ProviderError(format!(
                "eth_call timed out after {}s",
                self.timeout_duration.as_secs()
            ))),
        }
    }

    async fn submit(&self, tx: TxSubmission) -> EngineResult<TxEventStream> {
        let request = TransactionRequest::default()
            .with_from(tx.from)
            .with_to(tx.to)
            .with_input(tx.data);

        let pending = match timeout(
            self.timeout_duration,
            self.provider.send_transaction(request),
        )
        .await
        {
            Ok(Ok(pending)) => pending,
            Ok(Err(e)) => return Err(classify_submission_error(&e.to_string())),
            Err(_) => {
                return Err(EngineError::ProviderError(format!(
                    "transaction submission timed out after {}s",
                    self.timeout_duration.as_secs()
                )))
            }
        };
        let tx_hash = *pending.tx_hash();
        tracing::debug!(tx = %tx_hash, to = %tx.to, "Transaction submitted");

        let (events, stream) = mpsc::channel(TX_EVENT_CAPACITY);
        let _ = events
            .send(Ok(TxEvent {
                stage: TxStage::Submitted,
                tx_hash,
            }))
            .await;

        let provider = self.provider.clone();
        let confirmations = self.confirmation_blocks;
        let poll = self.poll_interval;
        tokio::spawn(async move {
            watch_lifecycle(provider, tx_hash, confirmations, poll, events).await;
        });

        Ok(stream)
    }
}

/// Poll for the receipt, then for confirmation depth, feeding the stage
/// channel. Ends after `Confirmed`, an error, or the consumer going away.
async fn watch_lifecycle(
    provider: Arc<dyn Provider + Send + Sync>,
    tx_hash: TxHash,
    required_confirmations: u32,
    poll_interval: Duration,
    events: mpsc::Sender<Result<TxEvent, EngineError>>,
) {
    let mut ticker = interval(poll_interval);
    let mut mined_block: Option<u64> = None;

    loop {
        ticker.tick().await;

        let Some(tx_block) = mined_block else {
            match provider.get_transaction_receipt(tx_hash).await {
                Ok(Some(receipt)) => {
                    if !receipt.status() {
                        let _ = events
                            .send(Err(EngineError::TransactionReverted(format!(
                                "transaction {} reverted on-chain",
                                tx_hash
                            ))))
                            .await;
                        return;
                    }
                    mined_block = Some(receipt.block_number.unwrap_or_default());
                    if events
                        .send(Ok(TxEvent {
                            stage: TxStage::Receipt,
                            tx_hash,
                        }))
                        .await
                        .is_err()
                    {
                        return;
                    }
                }
                Ok(None) => {
                    tracing::debug!(tx = %tx_hash, "Transaction pending");
                }
                Err(e) => {
                    let _ = events
                        .send(Err(EngineError::ProviderError(format!(
                            "receipt lookup failed: {}",
                            e
                        ))))
                        .await;
                    return;
                }
            }
            continue;
        };

        match provider.get_block_number().await {
            Ok(current) => {
                let depth = current.saturating_sub(tx_block) as u32;
                if depth >= required_confirmations {
                    let _ = events
                        .send(Ok(TxEvent {
                            stage: TxStage::Confirmed,
                            tx_hash,
                        }))
                        .await;
                    return;
                }
                tracing::debug!(
                    tx = %tx_hash,
                    confirmations = depth,
                    required = required_confirmations,
                    "Waiting for confirmations"
                );
            }
            Err(e) => {
                let _ = events
                    .send(Err(EngineError::ProviderError(format!(
                        "block number lookup failed: {}",
                        e
                    ))))
                    .await;
                return;
            }
        }
    }
}

/// Map a node-side submission failure onto the engine taxonomy. Signer
/// refusals follow the EIP-1193 convention (code 4001).
fn classify_submission_error(message: &str) -> EngineError {
    let lowered = message.to_lowercase();
    if lowered.contains("4001") || lowered.contains("rejected") || lowered.contains("denied") {
        EngineError::UserRejected
    } else {
        EngineError::ProviderError(format!("transaction submission failed: {}", message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_PRIVATE_KEY: &str =
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_ledger_creation() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let ledger = RpcLedger::new(&ProviderConfig::default(), wallet).unwrap();
        assert_eq!(
            ledger.sender.to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_invalid_rpc_url_rejected() {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let config = ProviderConfig {
            rpc_url: "not a url".to_string(),
            ..ProviderConfig::default()
        };
        assert!(matches!(
            RpcLedger::new(&config, wallet),
            Err(EngineError::ProviderUnavailable(_))
        ));
    }

    #[test]
    fn test_submission_error_classification() {
        assert_eq!(
            classify_submission_error("error code 4001: User rejected the request"),
            EngineError::UserRejected
        );
        assert_eq!(
            classify_submission_error("request denied by signer"),
            EngineError::UserRejected
        );
        assert!(matches!(
            classify_submission_error("connection refused"),
            EngineError::ProviderError(_)
        ));
    }
}
