//! CLI command implementations for Rift.

pub(crate) mod live;
pub(crate) mod replay;
pub(crate) mod run;
pub(crate) mod tournament;

mod output;

use clap::ValueEnum;
use rift::config::{ConfigError, MatchConfig};
use std::error::Error;
use std::fmt;
use std::path::Path;

/// Output format for the `run` and `replay` commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Output format for the `tournament` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum TournamentFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<rift::MatchError> for CliError {
    fn from(e: rift::MatchError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<rift::tournament::TournamentError> for CliError {
    fn from(e: rift::tournament::TournamentError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<rift::replay::ReplayError> for CliError {
    fn from(e: rift::replay::ReplayError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON serialization failed: {e}"))
    }
}

/// Configuration from `--config`, or the defaults.
pub(crate) fn load_config(path: Option<&Path>) -> Result<MatchConfig, CliError> {
    Ok(path.map(MatchConfig::load).transpose()?.unwrap_or_default())
}

/// Seed from the command line, or one derived from the clock.
pub(crate) fn seed_or_clock(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_nanos() & u128::from(u64::MAX)).unwrap_or(42))
            .unwrap_or(42)
    })
}
