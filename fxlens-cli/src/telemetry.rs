use anyhow::{anyhow, Result};
use fxlens_config::LogFormat;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Output goes to stderr so that reports on
/// stdout stay parseable.
///
/// An explicit `level` wins over `RUST_LOG`, which wins over `fallback`.
pub fn init_tracing(level: Option<&str>, fallback: &str, format: LogFormat) -> Result<()> {
    let filter = match level {
        Some(directive) => EnvFilter::try_new(directive)?,
        None => EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(fallback))?,
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
}
