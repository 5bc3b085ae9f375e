//! The published engine surface.
//!
//! `StakingEngine` wires the subsystems together and is the only surface the
//! view layer sees: read accessors for the snapshot, status, and mode, plus
//! the command functions. No other mutation path is exposed.

use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwapOption;
use tokio::sync::broadcast;

use crate::chain::{ChainConnector, LedgerProvider};
use crate::contracts::{ContractId, ContractRegistry};
use crate::error::{EngineError, EngineResult};
use crate::mode::{ModeSelector, StakeMode};
use crate::orchestrator::{TransactionOrchestrator, TransactionStatus};
use crate::sync::{EngineSnapshot, Identity, StateSynchronizer};

pub struct StakingEngine {
    connector: ChainConnector,
    registry: Arc<ContractRegistry>,
    synchronizer: Arc<StateSynchronizer>,
    orchestrator: TransactionOrchestrator,
    mode: ModeSelector,
    identity: ArcSwapOption<Identity>,
    /// The configuration error that took the engine out of service, if any.
    degraded: Mutex<Option<EngineError>>,
}

impl StakingEngine {
    pub fn new(provider: Arc<dyn LedgerProvider>, registry: ContractRegistry) -> Self {
        let connector = ChainConnector::new(provider);
        let registry = Arc::new(registry);
        let synchronizer = Arc::new(StateSynchronizer::new(connector.clone(), registry.clone()));
        let orchestrator =
            TransactionOrchestrator::new(connector.clone(), registry.clone(), synchronizer.clone());
        Self {
            connector,
            registry,
            synchronizer,
            orchestrator,
            mode: ModeSelector::new(),
            identity: ArcSwapOption::empty(),
            degraded: Mutex::new(None),
        }
    }

    /// Establish the session: discover the account and network, resolve both
    /// contracts fail-closed, and take the first snapshot.
    ///
    /// A failure leaves the engine non-operational until the next successful
    /// `connect`.
    pub async fn connect(&self) -> EngineResult<Identity> {
        match self.establish().await {
            Ok(identity) => {
                *self.degraded_slot() = None;
                Ok(identity)
            }
            Err(e) => {
                if e.is_fatal() {
                    *self.degraded_slot() = Some(e.clone());
                }
                Err(e)
            }
        }
    }

    async fn establish(&self) -> EngineResult<Identity> {
        let identity = self.connector.connect().await?;
        self.registry
            .resolve(ContractId::Token, identity.network_id)?;
        self.registry
            .resolve(ContractId::Staking, identity.network_id)?;
        self.identity.store(Some(Arc::new(identity.clone())));
        self.synchronizer.refresh(&identity).await?;
        Ok(identity)
    }

    /// The last successfully published snapshot.
    pub fn snapshot(&self) -> Option<Arc<EngineSnapshot>> {
        self.synchronizer.snapshot()
    }

    pub fn status(&self) -> TransactionStatus {
        self.orchestrator.status()
    }

    /// Ordered feed of status transitions, for consumers that render
    /// transaction progress.
    pub fn subscribe_status(&self) -> broadcast::Receiver<TransactionStatus> {
        self.orchestrator.subscribe_status()
    }

    pub fn identity(&self) -> Option<Arc<Identity>> {
        self.identity.load_full()
    }

    pub fn current_mode(&self) -> StakeMode {
        self.mode.current()
    }

    /// Flip the active pool. Changes nothing but which half of the snapshot
    /// and which entry points subsequent calls address.
    pub fn toggle_mode(&self) -> StakeMode {
        let mode = self.mode.toggle();
        tracing::info!(mode = %mode, "Mode switched");
        mode
    }

    pub fn is_operational(&self) -> bool {
        self.degraded_slot().is_none() && self.identity.load_full().is_some()
    }

    /// Re-pull the published snapshot.
    pub async fn refresh(&self) -> EngineResult<Arc<EngineSnapshot>> {
        let identity = self.require_operational()?;
        self.note_fatal(self.synchronizer.refresh(&identity).await)
    }

    /// Approve and stake `amount` into the currently active pool.
    pub async fn stake(&self, amount: &str) -> EngineResult<()> {
        let identity = self.require_operational()?;
        let mode = self.mode.current();
        self.note_fatal(self.orchestrator.stake(&identity, mode, amount).await)
    }

    /// Withdraw the full stake from the currently active pool.
    pub async fn unstake(&self) -> EngineResult<()> {
        let identity = self.require_operational()?;
        let mode = self.mode.current();
        self.note_fatal(self.orchestrator.unstake(&identity, mode).await)
    }

    /// Claim accumulated reward tokens.
    pub async fn claim(&self) -> EngineResult<()> {
        let identity = self.require_operational()?;
        let mode = self.mode.current();
        self.note_fatal(self.orchestrator.claim(&identity, mode).await)
    }

    /// Trigger reward redistribution for the currently active pool.
    pub async fn redistribute(&self) -> EngineResult<()> {
        let identity = self.require_operational()?;
        let mode = self.mode.current();
        self.note_fatal(self.orchestrator.redistribute(&identity, mode).await)
    }

    /// Commands require a connected, non-degraded session. A degraded engine
    /// keeps returning the configuration error that took it out of service.
    fn require_operational(&self) -> EngineResult<Identity> {
        if let Some(err) = self.degraded_slot().clone() {
            return Err(err);
        }
        self.identity
            .load_full()
            .map(|identity| (*identity).clone())
            .ok_or_else(|| {
                EngineError::ProviderUnavailable("engine is not connected".to_string())
            })
    }

    fn note_fatal<T>(&self, result: EngineResult<T>) -> EngineResult<T> {
        if let Err(e) = &result {
            if e.is_fatal() {
                tracing::error!(error = %e, "Engine degraded until reconnect");
                *self.degraded_slot() = Some(e.clone());
            }
        }
        result
    }

    fn degraded_slot(&self) -> std::sync::MutexGuard<'_, Option<EngineError>> {
        self.degraded.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
