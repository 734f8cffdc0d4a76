//! Logging initialization.
//!
//! The terminal UI owns stdout and stderr while it runs, so interactive
//! sessions log to a file. Batch subcommands log to stderr so stdout stays
//! clean JSON.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Mutex, Once};

use anyhow::{Context, Result};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

static INIT_ONCE: Once = Once::new();

/// Where log lines go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Stderr,
    File(PathBuf),
}

impl Output {
    /// File for interactive sessions: the configured one, else the data directory
    pub fn interactive(config: &LoggingConfig) -> Self {
        let path = config.file.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("rc-design")
                .join("rc-design.log")
        });
        Output::File(path)
    }
}

/// Build the filter: `RUST_LOG` wins over the configured level.
pub fn filter(config: &LoggingConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level)
            .with_context(|| format!("Invalid log level '{}'", config.level)),
    }
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(config: &LoggingConfig, output: Output) -> Result<()> {
    let filter = filter(config)?;

    let (writer, ansi) = match &output {
        Output::Stderr => (BoxMakeWriter::new(std::io::stderr), true),
        Output::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
    };

    INIT_ONCE.call_once(|| {
        // another subscriber may already be installed (tests)
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(ansi)
            .try_init();
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_idempotent() {
        let config = LoggingConfig::default();
        init(&config, Output::Stderr).unwrap();
        init(&config, Output::Stderr).unwrap();
    }

    #[test]
    fn test_interactive_uses_configured_file() {
        let config = LoggingConfig {
            file: Some(PathBuf::from("/tmp/rc.log")),
            ..LoggingConfig::default()
        };
        assert_eq!(Output::interactive(&config), Output::File(PathBuf::from("/tmp/rc.log")));
    }

    #[test]
    fn test_filter_accepts_directives() {
        let config = LoggingConfig {
            level: "calc_core=debug,info".to_string(),
            file: None,
        };
        assert!(filter(&config).is_ok());
    }
}
