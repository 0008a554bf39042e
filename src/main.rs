use std::process::ExitCode;

use clap::Parser;

use escrow_cli::cli::{commands, Cli};
use escrow_cli::config::{FileStore, ProcessEnv};
use escrow_cli::escrow::StellarSigner;
use escrow_cli::observability::init_logging;
use escrow_cli::Pipeline;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "escrow starting");

    let store = match FileStore::from_env() {
        Ok(store) => store,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let env = ProcessEnv::capture();
    let signer = StellarSigner::new();
    let http = match reqwest::Client::builder().build() {
        Ok(http) => http,
        Err(e) => {
            eprintln!("error: failed to initialize HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let pipeline = Pipeline::new(&store, &env, &signer, http);

    let mut stdout = std::io::stdout().lock();
    match commands::run(cli.command, &store, &pipeline, &mut stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            if let Some(hint) = e.remediation() {
                eprintln!("{}", hint);
            }
            ExitCode::from(e.exit_code())
        }
    }
}
