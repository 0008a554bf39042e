//! Transaction pipeline orchestrator.
//!
//! # State Machine
//! ```text
//! ResolvingConfig → SelectingEnvironment → Validating
//!     → RequestingUnsigned (deploy only)
//!     → Signing
//!     → Submitting (deploy, sign-and-send)
//!     → Done
//!
//! any stage ──error──▶ Failed(stage, error)
//! ```
//!
//! Stages run strictly in order and nothing is retried. Partial progress
//! (e.g. an unsigned envelope that was never signed) is dropped on failure.
//! The orchestrator never exits the process; the binary maps a
//! [`PipelineFailure`] to exit status 1.

pub mod types;

use crate::config::environment::select_base_url;
use crate::config::resolver::{ConfigResolver, ProcessEnv};
use crate::config::schema::{EffectiveConfig, Overrides};
use crate::config::store::CredentialStore;
use crate::config::validation::{validate_private_key, validate_public_key, validate_url};
use crate::error::PipelineResult;
use crate::escrow::client::EscrowClient;
use crate::escrow::payload::EscrowParameters;
use crate::escrow::types::{EscrowTopology, SignedEnvelope, SubmissionResult, UnsignedEnvelope};
use crate::escrow::wallet::Signer;

pub use types::{PipelineFailure, Stage};

/// Per-invocation inputs shared by every command.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Raw `--env` value; only `dev` is special.
    pub env_name: String,
    /// Raw `--baseUrl` value.
    pub base_url: Option<String>,
    pub overrides: Overrides,
}

impl Default for Invocation {
    fn default() -> Self {
        Self {
            env_name: "local".to_string(),
            base_url: None,
            overrides: Overrides::default(),
        }
    }
}

/// Output of the first three stages.
#[derive(Debug)]
struct Prepared {
    config: EffectiveConfig,
    base_url: String,
}

fn enter(stage: Stage) -> Stage {
    tracing::debug!(stage = %stage, "Entering stage");
    stage
}

/// Nothing reaches the network unless this passes.
fn validate_inputs(base_url: &str, config: &EffectiveConfig, check_public_key: bool) -> PipelineResult<()> {
    validate_url(base_url)?;
    if check_public_key {
        validate_public_key(&config.public_key)?;
    }
    validate_private_key(&config.private_key)
}

/// Runs pipelines against an injected store, environment and signer.
pub struct Pipeline<'a> {
    store: &'a dyn CredentialStore,
    env: &'a ProcessEnv,
    signer: &'a dyn Signer,
    http: reqwest::Client,
}

impl<'a> Pipeline<'a> {
    /// Pipeline over the given collaborators; `http` is shared by all requests.
    pub fn new(
        store: &'a dyn CredentialStore,
        env: &'a ProcessEnv,
        signer: &'a dyn Signer,
        http: reqwest::Client,
    ) -> Self {
        Self {
            store,
            env,
            signer,
            http,
        }
    }

    /// ResolvingConfig → SelectingEnvironment → Validating.
    fn prepare(&self, invocation: &Invocation, check_public_key: bool) -> Result<Prepared, PipelineFailure> {
        let stage = enter(Stage::ResolvingConfig);
        let config = ConfigResolver::new(self.store, self.env)
            .resolve(&invocation.overrides)
            .map_err(PipelineFailure::at(stage))?;

        let stage = enter(Stage::SelectingEnvironment);
        let base_url = select_base_url(&invocation.env_name, &config, invocation.base_url.as_deref())
            .map_err(PipelineFailure::at(stage))?;

        let stage = enter(Stage::Validating);
        validate_inputs(&base_url, &config, check_public_key).map_err(PipelineFailure::at(stage))?;

        tracing::info!(base_url = %base_url, environment = %invocation.env_name.trim(), "Using endpoint");
        Ok(Prepared { config, base_url })
    }

    fn sign_envelope(&self, prepared: &Prepared, unsigned: &UnsignedEnvelope) -> Result<SignedEnvelope, PipelineFailure> {
        let stage = enter(Stage::Signing);
        tracing::info!("Signing transaction with the configured secret key");
        self.signer
            .sign(
                unsigned,
                &prepared.config.private_key,
                &prepared.config.network_passphrase,
            )
            .map_err(|e| PipelineFailure::at(stage)(e.into()))
    }

    async fn submit(&self, client: &EscrowClient, signed: &SignedEnvelope) -> Result<SubmissionResult, PipelineFailure> {
        let stage = enter(Stage::Submitting);
        client.submit(signed).await.map_err(PipelineFailure::at(stage))
    }

    fn client(&self, prepared: &Prepared) -> EscrowClient {
        EscrowClient::new(self.http.clone(), &prepared.base_url, &prepared.config.bearer_token)
    }

    /// Request, sign and submit a new escrow deployment.
    pub async fn deploy(
        &self,
        invocation: &Invocation,
        topology: EscrowTopology,
        params: &EscrowParameters,
    ) -> Result<SubmissionResult, PipelineFailure> {
        let prepared = self.prepare(invocation, true)?;
        let client = self.client(&prepared);

        let stage = enter(Stage::RequestingUnsigned);
        let unsigned = client
            .request_unsigned(topology, &prepared.config.public_key, params)
            .await
            .map_err(PipelineFailure::at(stage))?;

        let signed = self.sign_envelope(&prepared, &unsigned)?;
        let result = self.submit(&client, &signed).await?;

        enter(Stage::Done);
        Ok(result)
    }

    /// Sign an envelope supplied by the caller; never submits.
    pub fn sign(&self, invocation: &Invocation, unsigned: &UnsignedEnvelope) -> Result<SignedEnvelope, PipelineFailure> {
        let prepared = self.prepare(invocation, false)?;
        let signed = self.sign_envelope(&prepared, unsigned)?;
        enter(Stage::Done);
        Ok(signed)
    }

    /// Sign an envelope supplied by the caller and submit it.
    pub async fn sign_and_send(
        &self,
        invocation: &Invocation,
        unsigned: &UnsignedEnvelope,
    ) -> Result<SubmissionResult, PipelineFailure> {
        let prepared = self.prepare(invocation, false)?;
        let signed = self.sign_envelope(&prepared, unsigned)?;
        let result = self.submit(&self.client(&prepared), &signed).await?;
        enter(Stage::Done);
        Ok(result)
    }
}
