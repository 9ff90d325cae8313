//! Severity levels for tagged log entries
//!
//! Levels are totally ordered by severity. The ordering drives both the
//! report summary (descending severity) and the error predicate used by the
//! conditional export policy.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a captured log entry, ordered from least to most severe
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Trace,
    #[default]
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Level {
    /// All levels, most severe first
    pub const BY_SEVERITY_DESC: [Level; 6] = [
        Level::Critical,
        Level::Error,
        Level::Warning,
        Level::Info,
        Level::Debug,
        Level::Trace,
    ];

    /// Whether this level counts as an error for export decisions
    ///
    /// `Warning`, `Error` and `Critical` are error levels.
    pub fn is_error(&self) -> bool {
        matches!(self, Level::Warning | Level::Error | Level::Critical)
    }

    /// Stable upper-case name used in reports
    pub fn name(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        }
    }

    /// Severity marker shown next to the level name in reports
    pub fn marker(&self) -> &'static str {
        match self {
            Level::Trace => "🔍",
            Level::Debug => "🐛",
            Level::Info => "ℹ️",
            Level::Warning => "⚠️",
            Level::Error => "❌",
            Level::Critical => "🔥",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a level name is not recognised
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError(String);

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown level: {}", self.0)
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TRACE" => Ok(Level::Trace),
            "DEBUG" => Ok(Level::Debug),
            "INFO" => Ok(Level::Info),
            "WARN" | "WARNING" => Ok(Level::Warning),
            "ERROR" => Ok(Level::Error),
            "CRITICAL" => Ok(Level::Critical),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}
