//! Subscriber setup
//!
//! Events go to stderr so that stdout carries only command output.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Install the global tracing subscriber
///
/// `RUST_LOG` overrides the default `info` filter.
///
/// # Errors
/// Fails if a global subscriber is already installed.
pub fn init(json: bool) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };
    installed.map_err(|e| anyhow::anyhow!(e))
}
