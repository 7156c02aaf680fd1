//! Subscriber setup for binaries that log through [`TracingLogger`].
//!
//! [`TracingLogger`]: playbook_core::TracingLogger

use playbook_core::{Error, Result};
use std::io::IsTerminal;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Level used when `RUST_LOG` is unset or unparsable
const DEFAULT_FILTER: &str = "info";

/// Initialize the tracing system
///
/// Reads the filter from `RUST_LOG`, falling back to `info`, and writes
/// compact events to stderr. ANSI colours are only used on a terminal.
/// Fails if a global subscriber is already installed.
pub fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .map_err(|e| Error::configuration(format!("invalid log filter: {e}")))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .compact()
        .with_target(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| Error::configuration(format!("failed to install tracing subscriber: {e}")))
}
