//! Transaction orchestration subsystem.
//!
//! # Data Flow
//! ```text
//! command (stake / unstake / claim / redistribute)
//!     → status.rs (claim the single in-flight slot)
//!     → dispatch.rs (mode + action → ledger entry point)
//!     → driver.rs (submit, walk stage events, settle)
//!     → StateSynchronizer.refresh on success
//! ```
//!
//! # Invariants
//! - At most one transaction sequence in flight; concurrent commands fail
//!   fast with `TransactionInProgress`
//! - A failed sequence never triggers a refresh
//! - The engine never auto-retries a financial transaction

pub mod dispatch;
pub mod driver;
pub mod status;

pub use dispatch::{entry_point, EntryPoint, StakeAction};
pub use driver::TransactionOrchestrator;
pub use status::{FailureReason, TransactionStatus};
