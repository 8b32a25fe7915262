//! Tracing subscriber installation.

use tracing_subscriber::{EnvFilter, fmt};

/// Failure to install the global subscriber.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TelemetryError {
    /// A global subscriber is already set, or installation failed.
    #[error("failed to install tracing subscriber: {message}")]
    Install { message: String },
}

/// Install the process-wide `fmt` subscriber filtered by `RUST_LOG`.
///
/// `json` selects JSON lines; otherwise the compact human format is used.
/// Callers normally pass
/// [`EngineSettings::json_logs()`](crate::config::EngineSettings::json_logs).
/// Calling this twice returns [`TelemetryError::Install`] rather than
/// panicking.
pub fn init_tracing(json: bool) -> Result<(), TelemetryError> {
    let builder = fmt().with_env_filter(EnvFilter::from_default_env());
    let installed = if json {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };
    installed.map_err(|err| TelemetryError::Install {
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn second_install_is_an_error_not_a_panic() {
        // Another test may have installed a subscriber already.
        let _ = init_tracing(true);
        let error = init_tracing(false).expect_err("subscriber already set");
        assert!(matches!(error, TelemetryError::Install { .. }));
    }
}
