//! Metrics collection.
//!
//! # Metrics
//! - `staking_refresh_total` (counter): snapshot refreshes by outcome
//! - `staking_transactions_total` (counter): transaction sequences by action
//!   and terminal state

use metrics::counter;

/// Count one snapshot refresh; `outcome` is `"ok"` or `"error"`.
pub fn record_refresh(outcome: &'static str) {
    counter!("staking_refresh_total", "outcome" => outcome).increment(1);
}

/// Count one transaction sequence reaching a terminal state; `outcome` is
/// `"confirmed"` or `"failed"`.
pub fn record_transaction(action: &'static str, outcome: &'static str) {
    counter!("staking_transactions_total", "action" => action, "outcome" => outcome).increment(1);
}
