use anyhow::Result;
use flexi_logger::{Logger, LoggerHandle};

/// Start logging to stderr. `RUST_LOG` overrides the default level.
///
/// Keep the returned handle alive for as long as the process logs.
pub fn setup_logging(verbose: bool) -> Result<LoggerHandle> {
    let base_level = if verbose { "debug" } else { "info" };
    let handle = Logger::try_with_env_or_str(base_level)?
        .log_to_stderr()
        .start()?;
    Ok(handle)
}
