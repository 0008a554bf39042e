//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once per process
//! - Honor `RUST_LOG`, falling back to `escrow_cli=info` (`debug` when verbose)
//! - Switch to JSON lines when `ESCROW_LOG_FORMAT=json`

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable selecting the log format (`json` or `pretty`).
pub const LOG_FORMAT_ENV_VAR: &str = "ESCROW_LOG_FORMAT";

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "escrow_cli=debug,escrow=debug"
    } else {
        "escrow_cli=info,escrow=info"
    }
}

pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directive(verbose).into());

    let json = std::env::var(LOG_FORMAT_ENV_VAR)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    // A second init (e.g. in tests) keeps the first subscriber.
    let _ = if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
}
