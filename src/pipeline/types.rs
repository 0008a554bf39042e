//! Pipeline stages and terminal failure.

use std::fmt;

use crate::config::schema::ConfigKey;
use crate::error::{KeyKind, PipelineError};

/// A step of the transaction pipeline. Stages only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    ResolvingConfig,
    SelectingEnvironment,
    Validating,
    RequestingUnsigned,
    Signing,
    Submitting,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ResolvingConfig => "resolving configuration",
            Stage::SelectingEnvironment => "selecting environment",
            Stage::Validating => "validating inputs",
            Stage::RequestingUnsigned => "requesting unsigned transaction",
            Stage::Signing => "signing transaction",
            Stage::Submitting => "submitting transaction",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// The `Failed(stage, error)` terminal state.
#[derive(Debug, thiserror::Error)]
#[error("{stage} failed: {error}")]
pub struct PipelineFailure {
    pub stage: Stage,
    #[source]
    pub error: PipelineError,
}

impl PipelineFailure {
    /// Tag errors with `stage`, for use with `map_err`.
    pub fn at(stage: Stage) -> impl FnOnce(PipelineError) -> Self {
        move |error| Self { stage, error }
    }

    /// Every pipeline failure terminates the invocation with status 1.
    pub fn exit_code(&self) -> u8 {
        1
    }

    /// Hint telling the user how to fix the failure.
    pub fn remediation(&self) -> String {
        remediation(&self.error)
    }
}

/// Stage-independent remediation text for an error.
pub fn remediation(error: &PipelineError) -> String {
    match error {
        PipelineError::MissingCredential { keys } => {
            let commands: Vec<String> = keys
                .iter()
                .map(|k| format!("  {}", k.set_command()))
                .collect();
            format!("Run:\n{}", commands.join("\n"))
        }
        PipelineError::MissingEndpoint { key, .. } => format!(
            "Run:\n  {}\nor pass --baseUrl <url> for this command.",
            key.set_command()
        ),
        PipelineError::InvalidUrlFormat { .. } => format!(
            "Fix the URL with:\n  {}\n  {}\nor pass a valid --baseUrl.",
            ConfigKey::BaseUrlLocal.set_command(),
            ConfigKey::BaseUrlDev.set_command()
        ),
        PipelineError::InvalidKeyFormat { kind } => {
            let flag = match kind {
                KeyKind::Public => "--publicKey",
                KeyKind::Private => "--secretKey",
            };
            format!(
                "Run:\n  {}\nor pass {} <key> for this command.",
                kind.config_key().set_command(),
                flag
            )
        }
        PipelineError::RequestTransport { .. } => {
            "Check that the service is reachable and that your token is valid:\n  escrow config set token <yourBearerToken>".to_string()
        }
        PipelineError::MalformedResponse { .. } => {
            "The builder answered without a transaction; check --env/--baseUrl points at the transaction builder.".to_string()
        }
        PipelineError::Signing(_) => format!(
            "Check the envelope and your secret key:\n  {}",
            ConfigKey::SecretKey.set_command()
        ),
        PipelineError::SubmissionRejected { .. } => {
            "The service rejected the transaction; see the response above.".to_string()
        }
        PipelineError::Store(_) => {
            "Check the permissions and contents of ~/.escrow/config.json.".to_string()
        }
    }
}
