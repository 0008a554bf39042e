//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! ~/.escrow/config.json          ESCROW_* env vars        --flags
//!     → store.rs (CredentialStore)   → resolver.rs (ProcessEnv)  → schema.rs (Overrides)
//!                 \                        |                        /
//!                  → resolver.rs merges: override > env > store > absent
//!                  → EffectiveConfig (fresh per invocation)
//!                  → environment.rs picks the base URL (--baseUrl > env endpoint)
//!                  → validation.rs checks URL and key shape before any request
//! ```
//!
//! # Design Decisions
//! - The store is injected, never a global
//! - Blank values never shadow a lower layer
//! - Endpoints are optional during resolution; each command checks the one it uses

pub mod environment;
pub mod resolver;
pub mod schema;
pub mod store;
pub mod validation;

pub use environment::{select_base_url, EnvironmentName};
pub use resolver::{ConfigResolver, ProcessEnv};
pub use schema::{ConfigKey, EffectiveConfig, Overrides};
pub use store::{CredentialStore, FileStore, MemoryStore, StoreError};
