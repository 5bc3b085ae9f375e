//! Transaction sequence drivers.
//!
//! Each command claims the in-flight slot, walks its stage transitions, and
//! settles: a successful sequence refreshes the snapshot, a failed one leaves
//! it untouched. Either way the slot is released for the next command.

use std::sync::Arc;

use alloy::primitives::Address;
use alloy::sol_types::SolCall;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::amount::Amount;
use crate::chain::{ChainConnector, TxEventStream, TxStage, TxSubmission};
use crate::contracts::abi::StakeToken;
use crate::contracts::{ContractId, ContractRegistry};
use crate::error::{EngineError, EngineResult};
use crate::mode::StakeMode;
use crate::observability::metrics;
use crate::orchestrator::dispatch::{entry_point, StakeAction};
use crate::orchestrator::status::{FailureReason, StatusCell, TransactionStatus};
use crate::sync::{Identity, StateSynchronizer};

pub struct TransactionOrchestrator {
    connector: ChainConnector,
    registry: Arc<ContractRegistry>,
    synchronizer: Arc<StateSynchronizer>,
    status: StatusCell,
}

impl TransactionOrchestrator {
    pub fn new(
        connector: ChainConnector,
        registry: Arc<ContractRegistry>,
        synchronizer: Arc<StateSynchronizer>,
    ) -> Self {
        Self {
            connector,
            registry,
            synchronizer,
            status: StatusCell::new(),
        }
    }

    pub fn status(&self) -> TransactionStatus {
        self.status.get()
    }

    pub fn subscribe_status(&self) -> broadcast::Receiver<TransactionStatus> {
        self.status.subscribe()
    }

    /// Approve and stake `amount` into the given pool.
    pub async fn stake(
        &self,
        identity: &Identity,
        mode: StakeMode,
        amount: &str,
    ) -> EngineResult<()> {
        // Validated locally; an invalid amount never reaches the ledger and
        // never touches the status cell.
        let amount = Amount::parse_positive(amount)?;
        let token = self.registry.resolve(ContractId::Token, identity.network_id)?;
        let staking = self
            .registry
            .resolve(ContractId::Staking, identity.network_id)?;

        self.status.begin(TransactionStatus::AwaitingApproval)?;
        let sequence = Uuid::new_v4();
        tracing::info!(%sequence, mode = %mode, amount = %amount, "Stake sequence started");

        let outcome = self
            .run_stake(identity, mode, amount, token.address, staking.address, sequence)
            .await;
        self.settle("stake", identity, sequence, outcome).await
    }

    async fn run_stake(
        &self,
        identity: &Identity,
        mode: StakeMode,
        amount: Amount,
        token: Address,
        staking: Address,
        sequence: Uuid,
    ) -> EngineResult<()> {
        // Approve the staking contract to spend the stake.
        let approval = StakeToken::approveCall {
            spender: staking,
            amount: amount.base_units(),
        }
        .abi_encode();
        let mut events = self
            .connector
            .submit(TxSubmission {
                from: identity.address,
                to: token,
                data: approval.into(),
            })
            .await?;
        self.await_stage(&mut events, TxStage::Submitted).await?;
        self.status.set(TransactionStatus::ApprovalPending);

        // Wait until the approval is mined; submitting the stake on the
        // approval's submission signal would race the allowance.
        self.await_stage(&mut events, TxStage::Receipt).await?;
        tracing::debug!(%sequence, "Approval receipted");

        self.run_action(
            identity,
            mode,
            StakeAction::Stake(amount.base_units()),
            Some(TransactionStatus::ActionPending),
        )
        .await
    }

    /// Withdraw the full stake from the given pool.
    pub async fn unstake(&self, identity: &Identity, mode: StakeMode) -> EngineResult<()> {
        self.simple_command(identity, mode, StakeAction::Unstake).await
    }

    /// Claim accumulated reward tokens.
    pub async fn claim(&self, identity: &Identity, mode: StakeMode) -> EngineResult<()> {
        self.simple_command(identity, mode, StakeAction::Claim).await
    }

    /// Trigger reward redistribution for the given pool.
    pub async fn redistribute(&self, identity: &Identity, mode: StakeMode) -> EngineResult<()> {
        self.simple_command(identity, mode, StakeAction::Redistribute)
            .await
    }

    /// Single-transaction command: no approval step.
    async fn simple_command(
        &self,
        identity: &Identity,
        mode: StakeMode,
        action: StakeAction,
    ) -> EngineResult<()> {
        let name = action.name();
        // Resolve before claiming the slot so a missing deployment fails
        // fast without consuming the lock.
        self.registry
            .resolve(ContractId::Staking, identity.network_id)?;

        self.status.begin(TransactionStatus::ActionPending)?;
        let sequence = Uuid::new_v4();
        tracing::info!(%sequence, mode = %mode, action = name, "Transaction sequence started");

        let outcome = self.run_action(identity, mode, action, None).await;
        self.settle(name, identity, sequence, outcome).await
    }

    /// Submit the action transaction and wait for its receipt. When the
    /// caller is not already in `ActionPending`, `status_after_submit` names
    /// the transition to take once the submission stage is observed.
    async fn run_action(
        &self,
        identity: &Identity,
        mode: StakeMode,
        action: StakeAction,
        status_after_submit: Option<TransactionStatus>,
    ) -> EngineResult<()> {
        let entry = entry_point(mode, &action);
        let target = self.registry.resolve(entry.contract, identity.network_id)?;

        let mut events = self
            .connector
            .submit(TxSubmission {
                from: identity.address,
                to: target.address,
                data: entry.calldata.into(),
            })
            .await?;
        self.await_stage(&mut events, TxStage::Submitted).await?;
        if let Some(status) = status_after_submit {
            self.status.set(status);
        }

        // Receipt is the durability point; a later Confirmed adds nothing.
        self.await_stage(&mut events, TxStage::Receipt).await
    }

    /// Consume stage events until `target` (or a later stage) arrives.
    async fn await_stage(&self, events: &mut TxEventStream, target: TxStage) -> EngineResult<()> {
        while let Some(event) = events.recv().await {
            match event {
                Ok(event) if event.stage >= target => return Ok(()),
                Ok(_) => {}
                Err(e) => return Err(e),
            }
        }
        Err(EngineError::ProviderError(
            "transaction event stream ended before settlement".to_string(),
        ))
    }

    async fn settle(
        &self,
        action: &'static str,
        identity: &Identity,
        sequence: Uuid,
        outcome: EngineResult<()>,
    ) -> EngineResult<()> {
        match outcome {
            Ok(()) => {
                self.status.set(TransactionStatus::Confirmed);
                metrics::record_transaction(action, "confirmed");
                tracing::info!(%sequence, action, "Transaction sequence confirmed");
                if let Err(e) = self.synchronizer.refresh(identity).await {
                    // The transaction settled; a failed refresh only leaves
                    // the previous snapshot in place.
                    tracing::warn!(%sequence, error = %e, "Post-settlement refresh failed");
                }
                Ok(())
            }
            Err(e) => {
                self.status
                    .set(TransactionStatus::Failed(FailureReason::from(e.clone())));
                metrics::record_transaction(action, "failed");
                tracing::warn!(%sequence, action, error = %e, "Transaction sequence failed");
                Err(e)
            }
        }
    }
}
