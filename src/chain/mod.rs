//! Ledger integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment variable (private key)
//!     → wallet.rs (key loading, signing identity)
//!     → rpc.rs (JSON-RPC provider, stage event feed)
//!     → provider.rs (the LedgerProvider boundary trait)
//!     → connector.rs (connect, call and submit passthrough)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys
//! - All RPC calls have configurable timeouts

pub mod connector;
pub mod provider;
pub mod rpc;
pub mod wallet;

pub use connector::{network_name, ChainConnector};
pub use provider::{LedgerProvider, TxEvent, TxEventStream, TxStage, TxSubmission};
pub use rpc::RpcLedger;
pub use wallet::Wallet;
