use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Initialize structured logging to stderr.
///
/// `RUST_LOG` takes precedence; otherwise only warnings are shown, or
/// lockscan debug events when `verbose` is set.
pub fn init_logging(verbose: bool) -> Result<()> {
    let default_filter = if verbose { "warn,lockscan=debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {}", e))?;

    tracing::debug!("logging initialized");

    Ok(())
}
