//! State synchronization subsystem.
//!
//! # Data Flow
//! ```text
//! ChainConnector (reads) + ContractRegistry (addresses)
//!     → synchronizer.rs (fetch everything, assemble one snapshot)
//!     → snapshot.rs (immutable value types)
//!     → atomic swap of the published Arc<EngineSnapshot>
//! ```

pub mod snapshot;
pub mod synchronizer;

pub use snapshot::{EngineSnapshot, Identity, PoolState, Pools};
pub use synchronizer::StateSynchronizer;
