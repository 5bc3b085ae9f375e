//! Structured logging.
//!
//! # Responsibilities
//! - Document the logging conventions; initialization lives in `main.rs`
//!   (tracing-subscriber registry with an EnvFilter)
//!
//! # Design Decisions
//! - Uses the tracing crate for structured logging
//! - Log level configurable via config and the RUST_LOG environment variable
//! - Transaction sequences carry a uuid correlation field (`sequence`)
//! - Key material is never logged
