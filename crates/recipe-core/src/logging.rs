use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::options::LogLevel;

/// Initialize a tracing subscriber for a run.
///
/// Logs go to stderr in compact form. `RUST_LOG` takes precedence over
/// `level`. Only the first call in a process installs a subscriber; later
/// calls return an error that callers are free to ignore.
pub fn init(level: LogLevel) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .compact();

    let filter_layer =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level.as_filter()))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::{error, info, warn};

    #[test]
    fn test_logging_init() {
        // Only the first init in the process can succeed
        let _ = init(LogLevel::Debug);
        assert!(init(LogLevel::Info).is_err());

        info!("This is an info message");
        warn!("This is a warning message");
        error!("This is an error message");
    }
}
