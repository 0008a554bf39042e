//! Error taxonomy shared by every pipeline stage.

use thiserror::Error;

use crate::config::schema::ConfigKey;
use crate::config::store::StoreError;

/// Which key format check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Public,
    Private,
}

impl KeyKind {
    /// Leading strkey character.
    pub fn prefix(self) -> char {
        match self {
            KeyKind::Public => 'G',
            KeyKind::Private => 'S',
        }
    }

    /// Store key holding this kind of key.
    pub fn config_key(self) -> ConfigKey {
        match self {
            KeyKind::Public => ConfigKey::PublicKey,
            KeyKind::Private => ConfigKey::SecretKey,
        }
    }
}

impl std::fmt::Display for KeyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyKind::Public => f.write_str("public key"),
            KeyKind::Private => f.write_str("secret key"),
        }
    }
}

/// Errors that can occur while running a transaction pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// One or more required credentials resolved to nothing.
    #[error("missing required configuration keys: {}", join_keys(.keys))]
    MissingCredential { keys: Vec<ConfigKey> },

    /// The selected environment has no endpoint configured.
    #[error("no base URL configured for environment \"{environment}\" (key {key})")]
    MissingEndpoint { environment: String, key: ConfigKey },

    #[error("base URL \"{url}\" must start with \"http://\" or \"https://\"")]
    InvalidUrlFormat { url: String },

    #[error("the {kind} is not valid (must start with \"{prefix}\" followed by 55 characters A-Z or 0-9)", prefix = .kind.prefix())]
    InvalidKeyFormat { kind: KeyKind },

    /// Network failure or non-2xx status from a remote call.
    #[error("request to {endpoint} failed: {message}")]
    RequestTransport { endpoint: String, message: String },

    #[error("response from {endpoint} did not contain a `{field}` field")]
    MalformedResponse { endpoint: String, field: &'static str },

    #[error("signing failed: {0}")]
    Signing(#[from] SigningError),

    /// The call succeeded but the service refused the transaction.
    #[error("transaction submission was rejected: {body}")]
    SubmissionRejected { body: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failure of the local signing capability.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SigningError {
    #[error("envelope is not valid base64: {0}")]
    Encoding(String),

    #[error("envelope is not a valid transaction envelope: {0}")]
    Envelope(String),

    #[error("legacy v0 envelopes are not supported")]
    UnsupportedEnvelope,

    #[error("secret key could not be decoded")]
    InvalidKey,

    #[error("envelope already carries the maximum number of signatures")]
    TooManySignatures,
}

fn join_keys(keys: &[ConfigKey]) -> String {
    keys.iter()
        .map(|k| k.store_key())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for pipeline stage functions.
pub type PipelineResult<T> = Result<T, PipelineError>;
