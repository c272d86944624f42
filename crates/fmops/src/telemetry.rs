use crate::config::TelemetryConfig;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("configured log filter '{spec}' is not a valid directive set")]
    InvalidFilter {
        spec: String,
        #[source]
        source: ParseError,
    },
    #[error("failed to install the global subscriber: {0}")]
    Install(Box<dyn std::error::Error + Send + Sync>),
}

/// Install the global fmt subscriber. An explicit `RUST_LOG` takes
/// precedence over the configured level; either way the filter is validated
/// before anything is installed.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(&config.log_level).map_err(|source| TelemetryError::InvalidFilter {
            spec: config.log_level.clone(),
            source,
        })
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .compact()
        .try_init()
        .map_err(TelemetryError::Install)
}
