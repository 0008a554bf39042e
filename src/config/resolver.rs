//! Layered configuration resolution.
//!
//! Each field is taken from the first layer that has a non-empty value:
//! explicit override, then process environment, then credential store.
//! Values are trimmed; a blank value never shadows a lower layer.

use std::collections::HashMap;

use crate::config::schema::{ConfigKey, EffectiveConfig, Overrides, DEFAULT_NETWORK_PASSPHRASE};
use crate::config::store::CredentialStore;
use crate::error::{PipelineError, PipelineResult};

const ENV_KEYS: [ConfigKey; 6] = [
    ConfigKey::PublicKey,
    ConfigKey::SecretKey,
    ConfigKey::Token,
    ConfigKey::BaseUrlLocal,
    ConfigKey::BaseUrlDev,
    ConfigKey::NetworkPassphrase,
];

/// Snapshot of the `ESCROW_*` process environment variables.
///
/// Captured once per invocation so resolution never reads ambient state.
#[derive(Clone, Default)]
pub struct ProcessEnv {
    vars: HashMap<ConfigKey, String>,
}

impl ProcessEnv {
    /// Read the current process environment.
    pub fn capture() -> Self {
        let vars = ENV_KEYS
            .iter()
            .filter_map(|key| std::env::var(key.env_var()).ok().map(|v| (*key, v)))
            .collect();
        Self { vars }
    }

    /// An empty environment.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Set one variable, replacing any previous value.
    pub fn with(mut self, key: ConfigKey, value: impl Into<String>) -> Self {
        self.vars.insert(key, value.into());
        self
    }

    fn get(&self, key: ConfigKey) -> Option<&str> {
        self.vars.get(&key).map(String::as_str)
    }
}

impl std::fmt::Debug for ProcessEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.vars.keys().map(|k| k.env_var()).collect();
        names.sort_unstable();
        f.debug_struct("ProcessEnv").field("set", &names).finish()
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Merges store, environment and overrides into an [`EffectiveConfig`].
pub struct ConfigResolver<'a> {
    store: &'a dyn CredentialStore,
    env: &'a ProcessEnv,
}

impl<'a> ConfigResolver<'a> {
    /// Resolver over the given store and environment snapshot.
    pub fn new(store: &'a dyn CredentialStore, env: &'a ProcessEnv) -> Self {
        Self { store, env }
    }

    /// Resolve a single key through all layers.
    pub fn lookup(&self, key: ConfigKey, overrides: &Overrides) -> PipelineResult<Option<String>> {
        if let Some(value) = non_empty(overrides.get(key)) {
            return Ok(Some(value));
        }
        if let Some(value) = non_empty(self.env.get(key)) {
            return Ok(Some(value));
        }
        let stored = self.store.get(key.store_key())?;
        Ok(non_empty(stored.as_deref()))
    }

    /// Produce the effective configuration.
    ///
    /// Fails with [`PipelineError::MissingCredential`] naming every absent
    /// required key. Endpoints stay optional here; they are checked per
    /// environment by the selector.
    pub fn resolve(&self, overrides: &Overrides) -> PipelineResult<EffectiveConfig> {
        let public_key = self.lookup(ConfigKey::PublicKey, overrides)?;
        let private_key = self.lookup(ConfigKey::SecretKey, overrides)?;
        let bearer_token = self.lookup(ConfigKey::Token, overrides)?;

        let (public_key, private_key, bearer_token) = match (public_key, private_key, bearer_token) {
            (Some(p), Some(s), Some(t)) => (p, s, t),
            (p, s, t) => {
                let keys = ConfigKey::REQUIRED
                    .into_iter()
                    .zip([p.is_none(), s.is_none(), t.is_none()])
                    .filter_map(|(key, missing)| missing.then_some(key))
                    .collect();
                return Err(PipelineError::MissingCredential { keys });
            }
        };

        let config = EffectiveConfig {
            local_endpoint: self.lookup(ConfigKey::BaseUrlLocal, overrides)?,
            dev_endpoint: self.lookup(ConfigKey::BaseUrlDev, overrides)?,
            public_key,
            private_key,
            bearer_token,
            network_passphrase: self
                .lookup(ConfigKey::NetworkPassphrase, overrides)?
                .unwrap_or_else(|| DEFAULT_NETWORK_PASSPHRASE.to_string()),
        };

        tracing::debug!(
            has_local_endpoint = config.local_endpoint.is_some(),
            has_dev_endpoint = config.dev_endpoint.is_some(),
            "Configuration resolved"
        );
        Ok(config)
    }
}
