//! Captured log entries

use chrono::{DateTime, Utc};
use serde::Serialize;
use taglog_core_types::{Level, Location};

/// A single captured event under a tag
///
/// Entries are built once by the registry and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    message: String,
    level: Level,
    location: Location,
    timestamp: DateTime<Utc>,
    error: Option<String>,
    stack_text: Option<String>,
}

impl LogEntry {
    pub fn new(
        message: String,
        level: Level,
        location: Location,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            message,
            level,
            location,
            timestamp,
            error: None,
            stack_text: None,
        }
    }

    pub fn with_error(mut self, error: Option<String>) -> Self {
        self.error = error;
        self
    }

    pub fn with_stack_text(mut self, stack_text: Option<String>) -> Self {
        self.stack_text = stack_text;
        self
    }

    /// Formatted message text
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Display form of the attached error, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn stack_text(&self) -> Option<&str> {
        self.stack_text.as_deref()
    }

    pub fn is_error(&self) -> bool {
        self.level.is_error()
    }
}
