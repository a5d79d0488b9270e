//! Tracing subscriber setup.

use anyhow::{anyhow, Result};
use lamden_config::LoggerConfig;
use tracing_subscriber::{fmt, EnvFilter};

const FALLBACK_FILTER: &str = "info,lamden=info";

/// `RUST_LOG` wins over `[logger] level`; an unparsable level falls back to info.
pub fn filter(logger: &LoggerConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logger.level))
        .unwrap_or_else(|_| EnvFilter::new(FALLBACK_FILTER))
}

/// Installs the global subscriber. Logs go to stderr so command output on
/// stdout stays valid JSON. Fails when a subscriber is already installed.
pub fn init_tracing(logger: &LoggerConfig) -> Result<()> {
    let builder = fmt().with_env_filter(filter(logger)).with_writer(std::io::stderr);
    let installed = if logger.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|err| anyhow!("failed to install tracing subscriber: {}", err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_reports_an_error() {
        let logger = LoggerConfig::default();
        let _ = init_tracing(&logger);
        let err = init_tracing(&logger).unwrap_err();
        assert!(err.to_string().starts_with("failed to install tracing subscriber"));
    }
}
