//! Tracing subscriber installation.

use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LogFormat;

const DEFAULT_DIRECTIVE: &str = "info";

/// Raised when a global subscriber is already installed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("tracing init failed: {message}")]
pub struct TelemetryError {
    message: String,
}

/// Install the global `tracing` subscriber.
///
/// Filtering follows `RUST_LOG`, defaulting to `info` when unset or invalid.
///
/// # Errors
///
/// Returns [`TelemetryError`] when a subscriber has already been installed.
pub fn init_tracing(format: LogFormat) -> Result<(), TelemetryError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    let builder = fmt().with_env_filter(filter);
    let result = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };
    result.map_err(|err| TelemetryError {
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn second_installation_is_rejected() {
        // The first call may race other tests in this binary; only the
        // second is guaranteed to find a subscriber in place.
        let _ = init_tracing(LogFormat::Json);

        let error = init_tracing(LogFormat::Pretty).expect_err("already installed");

        assert!(error.to_string().starts_with("tracing init failed"));
    }
}
