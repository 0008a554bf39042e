//! Escrow transaction subsystem.
//!
//! # Data Flow
//! ```text
//! EscrowParameters (payload.rs)
//!     → client.rs  POST {baseUrl}/deployer/{single|multi}-release   → UnsignedEnvelope
//!     → wallet.rs  local ed25519 signature over the network hash    → SignedEnvelope
//!     → client.rs  POST {baseUrl}/helper/send-transaction           → SubmissionResult
//! ```
//!
//! # Security Constraints
//! - Secret keys never leave the process; only signed envelopes are sent
//! - Bearer tokens and secret keys are never logged
//! - No call is retried: each builder call may mint a new transaction

pub mod client;
pub mod payload;
pub mod types;
pub mod wallet;

pub use client::EscrowClient;
pub use payload::EscrowParameters;
pub use types::{EscrowTopology, SignedEnvelope, SubmissionResult, UnsignedEnvelope};
pub use wallet::{Signer, StellarSigner};
