//! SettingsCraft Logging
//!
//! Shared `tracing-subscriber` setup for SettingsCraft binaries.
//! `RUST_LOG` always takes precedence over the requested level.

use std::fmt;

use tracing_subscriber::{fmt as fmt_layer, prelude::*, EnvFilter};

/// Log verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }

    /// Default filter directive for this level
    pub fn directive(&self) -> String {
        match self {
            Self::Debug | Self::Trace => format!("info,settingscraft={0}", self.as_str()),
            _ => self.as_str().to_string(),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.directive()))
}

/// Initialize logging, failing if a global subscriber is already set
pub fn try_init(level: LogLevel) -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(fmt_layer::layer().with_writer(std::io::stderr))
        .with(filter(level))
        .try_init()
}

/// Initialize logging, ignoring an already-installed subscriber
pub fn init(level: LogLevel) {
    let _ = try_init(level);
}
