//! Environment selection.
//!
//! An explicit `--baseUrl` always wins. Otherwise `dev` (trimmed,
//! case-insensitive) picks the dev endpoint and anything else falls back
//! to the local endpoint.

use std::fmt;

use crate::config::schema::{ConfigKey, EffectiveConfig};
use crate::error::{PipelineError, PipelineResult};

/// A named deployment target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentName {
    Local,
    Dev,
}

impl EnvironmentName {
    /// Permissive parse: only `dev` selects [`EnvironmentName::Dev`].
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("dev") {
            EnvironmentName::Dev
        } else {
            EnvironmentName::Local
        }
    }

    /// Store key holding this environment's endpoint.
    pub fn endpoint_key(self) -> ConfigKey {
        match self {
            EnvironmentName::Local => ConfigKey::BaseUrlLocal,
            EnvironmentName::Dev => ConfigKey::BaseUrlDev,
        }
    }
}

impl fmt::Display for EnvironmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvironmentName::Local => f.write_str("local"),
            EnvironmentName::Dev => f.write_str("dev"),
        }
    }
}

/// Pick the base URL for this invocation.
///
/// The error keeps the environment name as the user typed it (normalized),
/// so `--env staging` reports `staging` while pointing at `baseUrlLocal`.
pub fn select_base_url(
    env_name: &str,
    config: &EffectiveConfig,
    override_url: Option<&str>,
) -> PipelineResult<String> {
    if let Some(url) = override_url.map(str::trim).filter(|u| !u.is_empty()) {
        return Ok(url.to_string());
    }

    let environment = EnvironmentName::parse(env_name);
    let selected = match environment {
        EnvironmentName::Dev => config.dev_endpoint.as_deref(),
        EnvironmentName::Local => config.local_endpoint.as_deref(),
    };

    selected
        .map(str::to_string)
        .ok_or_else(|| PipelineError::MissingEndpoint {
            environment: env_name.trim().to_lowercase(),
            key: environment.endpoint_key(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EffectiveConfig {
        EffectiveConfig {
            local_endpoint: Some("http://localhost:3000".to_string()),
            dev_endpoint: Some("https://dev.example.com".to_string()),
            public_key: String::new(),
            private_key: String::new(),
            bearer_token: String::new(),
            network_passphrase: String::new(),
        }
    }

    #[test]
    fn test_dev_is_case_insensitive() {
        for name in ["dev", "DEV", " Dev "] {
            assert_eq!(
                select_base_url(name, &config(), None).unwrap(),
                "https://dev.example.com"
            );
        }
    }

    #[test]
    fn test_everything_else_is_local() {
        for name in ["local", "", "prod", "development", "d e v"] {
            assert_eq!(
                select_base_url(name, &config(), None).unwrap(),
                "http://localhost:3000"
            );
        }
    }

    #[test]
    fn test_override_wins() {
        assert_eq!(
            select_base_url("dev", &config(), Some("https://x")).unwrap(),
            "https://x"
        );
        assert_eq!(
            select_base_url("local", &config(), Some("https://x")).unwrap(),
            "https://x"
        );
    }

    #[test]
    fn test_missing_endpoint_names_key() {
        let mut cfg = config();
        cfg.dev_endpoint = None;
        let err = select_base_url("Dev", &cfg, None).unwrap_err();
        match err {
            PipelineError::MissingEndpoint { environment, key } => {
                assert_eq!(environment, "dev");
                assert_eq!(key, ConfigKey::BaseUrlDev);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        cfg.local_endpoint = None;
        let err = select_base_url("staging", &cfg, None).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::MissingEndpoint { key: ConfigKey::BaseUrlLocal, .. }
        ));
    }
}
