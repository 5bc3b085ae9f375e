//! On-chain contract surface.
//!
//! # Data Flow
//! ```text
//! config [[networks]] table
//!     → registry.rs (network id → deployed addresses, fail-closed lookup)
//!     → abi.rs (typed call encode/decode for the resolved address)
//! ```

pub mod abi;
pub mod registry;

pub use registry::{ContractHandle, ContractId, ContractRegistry};
