//! Escrow transaction CLI library.
//!
//! # Architecture Overview
//!
//! ```text
//!  ~/.escrow/config.json   ESCROW_* env   --flags
//!          │                   │             │
//!          └────────► config::resolver ◄─────┘
//!                          │ EffectiveConfig
//!                          ▼
//!               config::environment  (--baseUrl > baseUrlDev/baseUrlLocal)
//!                          │
//!               config::validation   (URL scheme, G.../S... key shape)
//!                          │
//!               escrow::client  ──POST /deployer/{topology}──▶ builder
//!                          │ UnsignedEnvelope
//!               escrow::wallet  (local ed25519 signature)
//!                          │ SignedEnvelope
//!               escrow::client  ──POST /helper/send-transaction──▶ ledger
//!                          │
//!                   SubmissionResult
//! ```
//!
//! `pipeline` sequences the stages and tags failures with the stage they
//! happened in; `cli` is the clap surface and `main` the only exit point.

pub mod cli;
pub mod config;
pub mod error;
pub mod escrow;
pub mod observability;
pub mod pipeline;

pub use config::{CredentialStore, EffectiveConfig, FileStore, Overrides};
pub use error::{PipelineError, SigningError};
pub use pipeline::{Invocation, Pipeline, PipelineFailure, Stage};
