//! Structured logging on stderr.
//!
//! `FOLIO_LOG_LEVEL` takes any `EnvFilter` directive and wins over `-v`.

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

pub const LOG_LEVEL_ENV: &str = "FOLIO_LOG_LEVEL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Human,
    /// Newline-delimited JSON.
    Json,
}

/// 0 → warn, 1 → info, 2 → debug, 3+ → trace.
#[must_use]
pub const fn verbosity_to_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs the global subscriber. Later calls are ignored.
pub fn init_logging(format: LogFormat, verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_LEVEL_ENV)
        .unwrap_or_else(|_| EnvFilter::new(verbosity_to_directive(verbosity)));
    let show_target = verbosity >= 2;

    match format {
        LogFormat::Human => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(show_target)
                .with_writer(std::io::stderr)
                .try_init();
        }
        LogFormat::Json => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .with_target(show_target)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(verbosity_to_directive(0), "warn");
        assert_eq!(verbosity_to_directive(1), "info");
        assert_eq!(verbosity_to_directive(2), "debug");
        assert_eq!(verbosity_to_directive(3), "trace");
        assert_eq!(verbosity_to_directive(255), "trace");
    }

    #[test]
    fn default_format_is_human() {
        assert_eq!(LogFormat::default(), LogFormat::Human);
    }

    #[test]
    fn repeated_init_is_harmless() {
        init_logging(LogFormat::Human, 0);
        init_logging(LogFormat::Json, 3);
    }
}
