//! Command handlers.
//!
//! Handlers print results to stdout and return errors to `main`, which is
//! the only place that decides the exit status.

use std::io::Write;

use thiserror::Error;

use crate::cli::{Commands, ConfigCommand, EscrowArgs, TargetArgs};
use crate::config::store::{CredentialStore, StoreError};
use crate::escrow::types::{EscrowTopology, SubmissionResult, UnsignedEnvelope};
use crate::pipeline::{Pipeline, PipelineFailure};

/// Failure of a CLI command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Pipeline(#[from] PipelineFailure),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("key '{0}' is not defined")]
    KeyNotFound(String),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl CommandError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            CommandError::Pipeline(failure) => failure.exit_code(),
            _ => 1,
        }
    }

    /// Follow-up hint printed after the error, if any.
    pub fn remediation(&self) -> Option<String> {
        match self {
            CommandError::Pipeline(failure) => Some(failure.remediation()),
            CommandError::KeyNotFound(key) => Some(format!("Run:\n  escrow config set {} <value>", key)),
            CommandError::Store(_) | CommandError::Output(_) => None,
        }
    }
}

/// Run one command, writing its result to `out`.
pub async fn run(
    command: Commands,
    store: &dyn CredentialStore,
    pipeline: &Pipeline<'_>,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    match command {
        Commands::Config(cmd) => run_config(cmd, store, out),
        Commands::Deploy {
            topology,
            target,
            escrow,
        } => deploy(pipeline, topology, &target, &escrow, out).await,
        Commands::DeploySingle { target, escrow } => {
            deploy(pipeline, EscrowTopology::SingleRelease, &target, &escrow, out).await
        }
        Commands::DeployMulti { target, escrow } => {
            deploy(pipeline, EscrowTopology::MultiRelease, &target, &escrow, out).await
        }
        Commands::Sign { xdr, target } => {
            let signed = pipeline.sign(&target.invocation(), &UnsignedEnvelope(xdr.trim().to_string()))?;
            writeln!(out, "{}", signed)?;
            Ok(())
        }
        Commands::SignAndSend { xdr, target } => {
            let result = pipeline
                .sign_and_send(&target.invocation(), &UnsignedEnvelope(xdr.trim().to_string()))
                .await?;
            print_submission(&result, out)
        }
    }
}

async fn deploy(
    pipeline: &Pipeline<'_>,
    topology: EscrowTopology,
    target: &TargetArgs,
    escrow: &EscrowArgs,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    let params = escrow.parameters(topology);
    let result = pipeline
        .deploy(&target.invocation(), topology, &params)
        .await?;
    print_submission(&result, out)
}

fn print_submission(result: &SubmissionResult, out: &mut dyn Write) -> Result<(), CommandError> {
    writeln!(out, "Transaction submitted successfully.")?;
    if let Some(contract_id) = &result.contract_id {
        writeln!(out, "Contract ID: {}", contract_id)?;
    }
    if let Some(escrow) = &result.escrow_data {
        let rendered = serde_json::to_string_pretty(escrow).unwrap_or_else(|_| escrow.to_string());
        writeln!(out, "Escrow data: {}", rendered)?;
    }
    Ok(())
}

fn run_config(cmd: ConfigCommand, store: &dyn CredentialStore, out: &mut dyn Write) -> Result<(), CommandError> {
    match cmd {
        ConfigCommand::List => {
            let entries = store.list()?;
            if entries.is_empty() {
                writeln!(
                    out,
                    "No configuration values stored. Use \"escrow config set <key> <value>\" to add one."
                )?;
                return Ok(());
            }
            writeln!(out, "Stored configuration:")?;
            for (key, value) in entries {
                writeln!(out, "  {}: {}", key, value)?;
            }
        }
        ConfigCommand::Get { key } => match store.get(&key)? {
            Some(value) => writeln!(out, "{}", value)?,
            None => return Err(CommandError::KeyNotFound(key)),
        },
        ConfigCommand::Set { key, value } => {
            store.set(&key, &value)?;
            tracing::debug!(key = %key, "Configuration key set");
            writeln!(out, "Saved '{}' in the global configuration.", key)?;
        }
        ConfigCommand::Unset { key } => {
            if store.unset(&key)? {
                writeln!(out, "Removed '{}' from the global configuration.", key)?;
            } else {
                writeln!(out, "Key '{}' was not set.", key)?;
            }
        }
    }
    Ok(())
}
