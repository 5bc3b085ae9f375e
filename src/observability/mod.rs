//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters on the metrics facade)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Whatever metrics recorder the embedding process installs
//! ```
//!
//! # Design Decisions
//! - Metrics are cheap (atomic increments), recorded unconditionally
//! - No exporter endpoint here; the engine is a library, the embedding
//!   process owns exposition

pub mod logging;
pub mod metrics;
