//! Command-line surface.

pub mod commands;

use clap::{Args, Parser, Subcommand};

use crate::config::schema::Overrides;
use crate::escrow::payload::EscrowParameters;
use crate::escrow::types::EscrowTopology;
use crate::pipeline::Invocation;

#[derive(Debug, Parser)]
#[command(name = "escrow")]
#[command(version, about = "Deploy, sign and submit escrow transactions", long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage the stored configuration (publicKey, secretKey, token, baseUrl...)
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Request an unsigned escrow deployment, sign it and submit it
    Deploy {
        /// Escrow topology: "single" or "multi"
        #[arg(long, default_value = "single")]
        topology: EscrowTopology,
        #[command(flatten)]
        target: TargetArgs,
        #[command(flatten)]
        escrow: EscrowArgs,
    },
    /// Deploy a single-release escrow
    DeploySingle {
        #[command(flatten)]
        target: TargetArgs,
        #[command(flatten)]
        escrow: EscrowArgs,
    },
    /// Deploy a multi-release escrow
    DeployMulti {
        #[command(flatten)]
        target: TargetArgs,
        #[command(flatten)]
        escrow: EscrowArgs,
    },
    /// Sign an unsigned envelope and print it
    Sign {
        /// Unsigned transaction envelope (base64 XDR)
        xdr: String,
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Sign an unsigned envelope and submit it
    SignAndSend {
        /// Unsigned transaction envelope (base64 XDR)
        xdr: String,
        #[command(flatten)]
        target: TargetArgs,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show every stored key and value
    List,
    /// Show the value stored under <KEY>
    Get { key: String },
    /// Store <VALUE> under <KEY>
    Set { key: String, value: String },
    /// Remove <KEY> if present
    Unset { key: String },
}

/// Endpoint and credential flags shared by pipeline commands.
#[derive(Debug, Clone, Args)]
pub struct TargetArgs {
    /// Environment: "local" or "dev"
    #[arg(long, default_value = "local")]
    pub env: String,

    /// Use this base URL instead of the configured one
    #[arg(long = "baseUrl")]
    pub base_url: Option<String>,

    /// Public key (overrides the stored value)
    #[arg(long = "publicKey")]
    pub public_key: Option<String>,

    /// Secret key (overrides the stored value)
    #[arg(long = "secretKey")]
    pub secret_key: Option<String>,

    /// Bearer token (overrides the stored value)
    #[arg(long)]
    pub token: Option<String>,

    /// Network passphrase the signature commits to
    #[arg(long = "networkPassphrase")]
    pub network_passphrase: Option<String>,
}

impl TargetArgs {
    /// Per-invocation inputs for the pipeline.
    pub fn invocation(&self) -> Invocation {
        Invocation {
            env_name: self.env.clone(),
            base_url: self.base_url.clone(),
            overrides: Overrides {
                public_key: self.public_key.clone(),
                secret_key: self.secret_key.clone(),
                token: self.token.clone(),
                network_passphrase: self.network_passphrase.clone(),
            },
        }
    }
}

/// Escrow terms; unset flags keep the topology defaults.
#[derive(Debug, Clone, Default, Args)]
pub struct EscrowArgs {
    #[arg(long)]
    pub engagement_id: Option<String>,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Total escrow amount
    #[arg(long)]
    pub amount: Option<f64>,
    #[arg(long)]
    pub platform_fee: Option<f64>,
    /// Milestone description (repeatable)
    #[arg(long = "milestone")]
    pub milestones: Vec<String>,
    /// Trustline asset contract address
    #[arg(long)]
    pub trustline_address: Option<String>,
    #[arg(long)]
    pub trustline_decimals: Option<u64>,
    #[arg(long)]
    pub receiver_memo: Option<u64>,
    /// Receiver role (defaults to the signer)
    #[arg(long)]
    pub receiver: Option<String>,
}

impl EscrowArgs {
    /// Escrow terms, falling back to the topology defaults.
    pub fn parameters(&self, topology: EscrowTopology) -> EscrowParameters {
        let defaults = EscrowParameters::defaults_for(topology);
        EscrowParameters {
            engagement_id: self.engagement_id.clone().unwrap_or(defaults.engagement_id),
            title: self.title.clone().unwrap_or(defaults.title),
            description: self.description.clone().unwrap_or(defaults.description),
            amount: self.amount.unwrap_or(defaults.amount),
            platform_fee: self.platform_fee.unwrap_or(defaults.platform_fee),
            milestones: if self.milestones.is_empty() {
                defaults.milestones
            } else {
                self.milestones.clone()
            },
            trustline_address: self
                .trustline_address
                .clone()
                .unwrap_or(defaults.trustline_address),
            trustline_decimals: self.trustline_decimals.unwrap_or(defaults.trustline_decimals),
            receiver_memo: self.receiver_memo.unwrap_or(defaults.receiver_memo),
            receiver: self.receiver.clone().or(defaults.receiver),
        }
    }
}
