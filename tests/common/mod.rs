//! Shared mock ledger for integration tests.
//!
//! `MockLedger` implements the `LedgerProvider` boundary over a tiny in-memory
//! two-pool chain model, so scenario tests can drive the whole engine without
//! a node. Transaction outcomes are scriptable per submission: settle
//! normally, reject at submission, fail after submission, or hold the stage
//! stream open for the test to feed.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::sol_types::{SolCall, SolValue};
use async_trait::async_trait;
use tokio::sync::mpsc;

use staking_engine::chain::{LedgerProvider, TxEvent, TxEventStream, TxStage, TxSubmission};
use staking_engine::contracts::abi::{StakeToken, TokenStaking};
use staking_engine::error::{EngineError, EngineResult};

pub const ACCOUNT: Address = Address::new([0x11; 20]);
pub const TOKEN: Address = Address::new([0xAA; 20]);
pub const STAKING: Address = Address::new([0xBB; 20]);
pub const NETWORK_ID: u64 = 31337;

/// One whole token in base units.
pub fn tokens(n: u64) -> U256 {
    U256::from(n) * U256::from(10).pow(U256::from(18))
}

/// Scripted outcome for one submitted transaction.
#[allow(dead_code)]
pub enum TxScript {
    /// Apply the calldata to the chain model and run Submitted → Receipt →
    /// Confirmed.
    Settle,
    /// Refuse at submission time; no stage stream is produced.
    RejectSubmission(EngineError),
    /// Emit Submitted, then fail the stream with the given error.
    FailAfterSubmit(EngineError),
    /// Emit Submitted, then hold the stream open; the test feeds or drops the
    /// retained sender.
    HoldAfterSubmit,
}

/// Minimal two-pool staking chain model.
pub struct ChainModel {
    pub chain_id: u64,
    pub accounts: Vec<Address>,
    pub token_balances: HashMap<Address, U256>,
    pub standard_stakes: HashMap<Address, U256>,
    pub custom_stakes: HashMap<Address, U256>,
    pub standard_total: U256,
    pub custom_total: U256,
    pub default_apy_raw: U256,
    pub custom_apy_raw: U256,
}

impl ChainModel {
    pub fn seeded() -> Self {
        let mut token_balances = HashMap::new();
        token_balances.insert(ACCOUNT, tokens(100));
        token_balances.insert(STAKING, tokens(50));
        Self {
            chain_id: NETWORK_ID,
            accounts: vec![ACCOUNT],
            token_balances,
            standard_stakes: HashMap::new(),
            custom_stakes: HashMap::new(),
            standard_total: U256::ZERO,
            custom_total: U256::ZERO,
            default_apy_raw: U256::from(274),
            custom_apy_raw: U256::from(548),
        }
    }

    fn answer_call(&self, to: Address, data: &[u8]) -> Option<Vec<u8>> {
        if to == TOKEN {
            if let Ok(call) = StakeToken::balanceOfCall::abi_decode(data) {
                let balance = self
                    .token_balances
                    .get(&call.owner)
                    .copied()
                    .unwrap_or_default();
                return Some(balance.abi_encode());
            }
            return None;
        }
        if to != STAKING {
            return None;
        }
        if let Ok(call) = TokenStaking::stakingBalanceCall::abi_decode(data) {
            let stake = self
                .standard_stakes
                .get(&call.account)
                .copied()
                .unwrap_or_default();
            return Some(stake.abi_encode());
        }
        if let Ok(call) = TokenStaking::customStakingBalanceCall::abi_decode(data) {
            let stake = self
                .custom_stakes
                .get(&call.account)
                .copied()
                .unwrap_or_default();
            return Some(stake.abi_encode());
        }
        if TokenStaking::totalStakedCall::abi_decode(data).is_ok() {
            return Some(self.standard_total.abi_encode());
        }
        if TokenStaking::customTotalStakedCall::abi_decode(data).is_ok() {
            return Some(self.custom_total.abi_encode());
        }
        if TokenStaking::defaultAPYCall::abi_decode(data).is_ok() {
            return Some(self.default_apy_raw.abi_encode());
        }
        if TokenStaking::customAPYCall::abi_decode(data).is_ok() {
            return Some(self.custom_apy_raw.abi_encode());
        }
        None
    }

    /// Apply a mined transaction's state transition.
    fn apply_tx(&mut self, from: Address, to: Address, data: &[u8]) {
        if to == TOKEN {
            // approve is an allowance-only operation; the model has no
            // allowance bookkeeping to update
            return;
        }
        if to != STAKING {
            return;
        }
        if let Ok(call) = TokenStaking::stakeTokensCall::abi_decode(data) {
            self.move_into_pool(from, call.amount, false);
        } else if let Ok(call) = TokenStaking::customStakingCall::abi_decode(data) {
            self.move_into_pool(from, call.amount, true);
        } else if TokenStaking::unstakeTokensCall::abi_decode(data).is_ok() {
            self.move_out_of_pool(from, false);
        } else if TokenStaking::customUnstakeCall::abi_decode(data).is_ok() {
            self.move_out_of_pool(from, true);
        }
        // claim and redistribute settle without observable balance changes
        // in this model
    }

    fn move_into_pool(&mut self, staker: Address, amount: U256, custom: bool) {
        let balance = self.token_balances.entry(staker).or_default();
        *balance = balance.saturating_sub(amount);
        *self.token_balances.entry(STAKING).or_default() += amount;
        if custom {
            *self.custom_stakes.entry(staker).or_default() += amount;
            self.custom_total += amount;
        } else {
            *self.standard_stakes.entry(staker).or_default() += amount;
            self.standard_total += amount;
        }
    }

    fn move_out_of_pool(&mut self, staker: Address, custom: bool) {
        let staked = if custom {
            self.custom_stakes.remove(&staker).unwrap_or_default()
        } else {
            self.standard_stakes.remove(&staker).unwrap_or_default()
        };
        if custom {
            self.custom_total = self.custom_total.saturating_sub(staked);
        } else {
            self.standard_total = self.standard_total.saturating_sub(staked);
        }
        let contract = self.token_balances.entry(STAKING).or_default();
        *contract = contract.saturating_sub(staked);
        *self.token_balances.entry(staker).or_default() += staked;
    }
}

/// Scriptable in-memory ledger provider.
pub struct MockLedger {
    pub model: Mutex<ChainModel>,
    scripts: Mutex<VecDeque<TxScript>>,
    /// Senders of held stage streams, in submission order.
    pub held: Mutex<Vec<mpsc::Sender<Result<TxEvent, EngineError>>>>,
    submissions: Mutex<Vec<TxSubmission>>,
    /// Selector whose read calls fail, for partial-refresh scenarios.
    poisoned_selector: Mutex<Option<[u8; 4]>>,
    reads: AtomicUsize,
    next_tx: AtomicU64,
}

#[allow(dead_code)]
impl MockLedger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            model: Mutex::new(ChainModel::seeded()),
            scripts: Mutex::new(VecDeque::new()),
            held: Mutex::new(Vec::new()),
            submissions: Mutex::new(Vec::new()),
            poisoned_selector: Mutex::new(None),
            reads: AtomicUsize::new(0),
            next_tx: AtomicU64::new(1),
        })
    }

    /// Queue the outcome for the next unscripted submission.
    pub fn script(&self, script: TxScript) {
        self.scripts.lock().unwrap().push_back(script);
    }

    /// Fail every read call whose calldata starts with `selector`.
    pub fn poison_selector(&self, selector: [u8; 4]) {
        *self.poisoned_selector.lock().unwrap() = Some(selector);
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }

    pub fn submissions(&self) -> Vec<TxSubmission> {
        self.submissions.lock().unwrap().clone()
    }

    /// Take the sender of the oldest held stage stream.
    pub fn take_held(&self) -> mpsc::Sender<Result<TxEvent, EngineError>> {
        self.held.lock().unwrap().remove(0)
    }

    fn next_hash(&self) -> TxHash {
        TxHash::repeat_byte(self.next_tx.fetch_add(1, Ordering::SeqCst) as u8)
    }
}

#[async_trait]
impl LedgerProvider for MockLedger {
    async fn accounts(&self) -> EngineResult<Vec<Address>> {
        Ok(self.model.lock().unwrap().accounts.clone())
    }

    async fn chain_id(&self) -> EngineResult<u64> {
        Ok(self.model.lock().unwrap().chain_id)
    }

    async fn call(&self, to: Address, data: Bytes) -> EngineResult<Bytes> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if let Some(selector) = *self.poisoned_selector.lock().unwrap() {
            if data.len() >= 4 && data[..4] == selector {
                return Err(EngineError::ProviderError(
                    "injected read failure".to_string(),
                ));
            }
        }
        self.model
            .lock()
            .unwrap()
            .answer_call(to, &data)
            .map(Bytes::from)
            .ok_or_else(|| EngineError::ProviderError(format!("unexpected call to {to}")))
    }

    async fn submit(&self, tx: TxSubmission) -> EngineResult<TxEventStream> {
        self.submissions.lock().unwrap().push(tx.clone());
        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(TxScript::Settle);
        let tx_hash = self.next_hash();
        let (events, stream) = mpsc::channel(4);

        match script {
            TxScript::RejectSubmission(err) => return Err(err),
            TxScript::FailAfterSubmit(err) => {
                events
                    .send(Ok(TxEvent {
                        stage: TxStage::Submitted,
                        tx_hash,
                    }))
                    .await
                    .unwrap();
                events.send(Err(err)).await.unwrap();
            }
            TxScript::HoldAfterSubmit => {
                events
                    .send(Ok(TxEvent {
                        stage: TxStage::Submitted,
                        tx_hash,
                    }))
                    .await
                    .unwrap();
                self.held.lock().unwrap().push(events);
            }
            TxScript::Settle => {
                self.model
                    .lock()
                    .unwrap()
                    .apply_tx(tx.from, tx.to, &tx.data);
                for stage in [TxStage::Submitted, TxStage::Receipt, TxStage::Confirmed] {
                    events.send(Ok(TxEvent { stage, tx_hash })).await.unwrap();
                }
            }
        }
        Ok(stream)
    }
}
