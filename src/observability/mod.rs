//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! config / escrow / pipeline
//!     → tracing events (stage transitions, endpoints, outcomes)
//!     → logging.rs subscriber → stderr
//! ```
//!
//! # Design Decisions
//! - stdout carries command results only; diagnostics go to stderr
//! - Secrets are never recorded as event fields

pub mod logging;

pub use logging::init_logging;
