//! Transaction status and the single in-flight lock.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;

use crate::error::{EngineError, EngineResult};

/// Why a transaction sequence ended in `Failed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    UserRejected,
    Reverted(String),
    Provider(String),
}

impl From<EngineError> for FailureReason {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::UserRejected => FailureReason::UserRejected,
            EngineError::TransactionReverted(msg) => FailureReason::Reverted(msg),
            other => FailureReason::Provider(other.to_string()),
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::UserRejected => f.write_str("rejected by user"),
            FailureReason::Reverted(msg) | FailureReason::Provider(msg) => f.write_str(msg),
        }
    }
}

/// Lifecycle of the one permitted in-flight transaction sequence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TransactionStatus {
    #[default]
    Idle,
    AwaitingApproval,
    ApprovalPending,
    ActionPending,
    Confirmed,
    Failed(FailureReason),
}

impl TransactionStatus {
    /// Terminal states accept a new command; everything else is in flight.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TransactionStatus::Idle | TransactionStatus::Confirmed | TransactionStatus::Failed(_)
        )
    }

    pub fn is_in_flight(&self) -> bool {
        !self.is_terminal()
    }
}

/// Single-writer status cell.
///
/// `begin` is the in-flight lock: it only admits a new sequence from a
/// terminal state, and a refused `begin` leaves the current status untouched.
/// Every transition is also broadcast so a consumer can observe the ordered
/// sequence.
pub struct StatusCell {
    current: Mutex<TransactionStatus>,
    transitions: broadcast::Sender<TransactionStatus>,
}

impl StatusCell {
    pub fn new() -> Self {
        let (transitions, _) = broadcast::channel(16);
        Self {
            current: Mutex::new(TransactionStatus::Idle),
            transitions,
        }
    }

    pub fn get(&self) -> TransactionStatus {
        self.lock().clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TransactionStatus> {
        self.transitions.subscribe()
    }

    /// Claim the in-flight slot, entering `initial`.
    pub fn begin(&self, initial: TransactionStatus) -> EngineResult<()> {
        let mut current = self.lock();
        if current.is_in_flight() {
            return Err(EngineError::TransactionInProgress);
        }
        *current = initial.clone();
        let _ = self.transitions.send(initial);
        Ok(())
    }

    pub fn set(&self, status: TransactionStatus) {
        *self.lock() = status.clone();
        let _ = self.transitions.send(status);
    }

    fn lock(&self) -> MutexGuard<'_, TransactionStatus> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for StatusCell {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_classification() {
        assert!(TransactionStatus::Idle.is_terminal());
        assert!(TransactionStatus::Confirmed.is_terminal());
        assert!(TransactionStatus::Failed(FailureReason::UserRejected).is_terminal());
        assert!(TransactionStatus::AwaitingApproval.is_in_flight());
        assert!(TransactionStatus::ApprovalPending.is_in_flight());
        assert!(TransactionStatus::ActionPending.is_in_flight());
    }

    #[test]
    fn test_begin_from_terminal_states() {
        let cell = StatusCell::new();
        cell.begin(TransactionStatus::AwaitingApproval).unwrap();
        cell.set(TransactionStatus::Confirmed);
        cell.begin(TransactionStatus::ActionPending).unwrap();
        cell.set(TransactionStatus::Failed(FailureReason::UserRejected));
        cell.begin(TransactionStatus::ActionPending).unwrap();
    }

    #[test]
    fn test_begin_refused_while_in_flight() {
        let cell = StatusCell::new();
        cell.begin(TransactionStatus::ApprovalPending).unwrap();
        let err = cell.begin(TransactionStatus::ActionPending).unwrap_err();
        assert_eq!(err, EngineError::TransactionInProgress);
        // refused begin leaves the status untouched
        assert_eq!(cell.get(), TransactionStatus::ApprovalPending);
    }

    #[test]
    fn test_transitions_are_broadcast_in_order() {
        let cell = StatusCell::new();
        let mut feed = cell.subscribe();
        cell.begin(TransactionStatus::AwaitingApproval).unwrap();
        cell.set(TransactionStatus::ApprovalPending);
        cell.set(TransactionStatus::ActionPending);
        cell.set(TransactionStatus::Confirmed);

        let mut seen = Vec::new();
        while let Ok(status) = feed.try_recv() {
            seen.push(status);
        }
        assert_eq!(
            seen,
            vec![
                TransactionStatus::AwaitingApproval,
                TransactionStatus::ApprovalPending,
                TransactionStatus::ActionPending,
                TransactionStatus::Confirmed,
            ]
        );
    }
}
