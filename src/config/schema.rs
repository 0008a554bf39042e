//! Configuration schema definitions.
//!
//! Defines the keys the credential store understands, the per-invocation
//! overrides taken from command-line flags, and the merged
//! [`EffectiveConfig`] that the pipeline consumes.

use std::fmt;

/// Default network passphrase (Stellar testnet).
pub const DEFAULT_NETWORK_PASSPHRASE: &str = "Test SDF Network ; September 2015";

/// A well-known configuration key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    PublicKey,
    SecretKey,
    Token,
    BaseUrlLocal,
    BaseUrlDev,
    NetworkPassphrase,
}

impl ConfigKey {
    /// Keys that must resolve to a value for any pipeline command.
    pub const REQUIRED: [ConfigKey; 3] = [ConfigKey::PublicKey, ConfigKey::SecretKey, ConfigKey::Token];

    /// Name of the key inside the credential store file.
    pub fn store_key(self) -> &'static str {
        match self {
            ConfigKey::PublicKey => "publicKey",
            ConfigKey::SecretKey => "secretKey",
            ConfigKey::Token => "token",
            ConfigKey::BaseUrlLocal => "baseUrlLocal",
            ConfigKey::BaseUrlDev => "baseUrlDev",
            ConfigKey::NetworkPassphrase => "networkPassphrase",
        }
    }

    /// Name of the process environment variable for this key.
    pub fn env_var(self) -> &'static str {
        match self {
            ConfigKey::PublicKey => "ESCROW_PUBLIC_KEY",
            ConfigKey::SecretKey => "ESCROW_SECRET_KEY",
            ConfigKey::Token => "ESCROW_TOKEN",
            ConfigKey::BaseUrlLocal => "ESCROW_BASE_URL_LOCAL",
            ConfigKey::BaseUrlDev => "ESCROW_BASE_URL_DEV",
            ConfigKey::NetworkPassphrase => "ESCROW_NETWORK_PASSPHRASE",
        }
    }

    /// Placeholder used in `escrow config set` remediation hints.
    pub fn placeholder(self) -> &'static str {
        match self {
            ConfigKey::PublicKey => "<yourPublicKey>",
            ConfigKey::SecretKey => "<yourSecretKey>",
            ConfigKey::Token => "<yourBearerToken>",
            ConfigKey::BaseUrlLocal | ConfigKey::BaseUrlDev => "<url>",
            ConfigKey::NetworkPassphrase => "<passphrase>",
        }
    }

    /// The exact command that sets this key in the store.
    pub fn set_command(self) -> String {
        format!("escrow config set {} {}", self.store_key(), self.placeholder())
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.store_key())
    }
}

/// Values passed explicitly for a single invocation (command-line flags).
#[derive(Clone, Default)]
pub struct Overrides {
    pub public_key: Option<String>,
    pub secret_key: Option<String>,
    pub token: Option<String>,
    pub network_passphrase: Option<String>,
}

impl Overrides {
    pub(crate) fn get(&self, key: ConfigKey) -> Option<&str> {
        match key {
            ConfigKey::PublicKey => self.public_key.as_deref(),
            ConfigKey::SecretKey => self.secret_key.as_deref(),
            ConfigKey::Token => self.token.as_deref(),
            ConfigKey::NetworkPassphrase => self.network_passphrase.as_deref(),
            // Endpoint overrides go through `--baseUrl` and the environment selector.
            ConfigKey::BaseUrlLocal | ConfigKey::BaseUrlDev => None,
        }
    }
}

impl fmt::Debug for Overrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overrides")
            .field("public_key", &self.public_key)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("network_passphrase", &self.network_passphrase)
            .finish()
    }
}

/// Configuration merged from store, process environment and overrides.
///
/// Built fresh for every invocation. Required keys are guaranteed present
/// once the resolver returns successfully.
#[derive(Clone, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub local_endpoint: Option<String>,
    pub dev_endpoint: Option<String>,
    pub public_key: String,
    pub private_key: String,
    pub bearer_token: String,
    pub network_passphrase: String,
}

impl fmt::Debug for EffectiveConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectiveConfig")
            .field("local_endpoint", &self.local_endpoint)
            .field("dev_endpoint", &self.dev_endpoint)
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .field("bearer_token", &"<redacted>")
            .field("network_passphrase", &self.network_passphrase)
            .finish()
    }
}
